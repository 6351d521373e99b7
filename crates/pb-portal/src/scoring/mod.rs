//! Weighted committee scoring.
//!
//! Raw per-criterion scores are normalised against the scale maximum, weighted
//! by the rubric, and reported as a whole percentage:
//!
//! ```text
//! weighted_total = round( Σ (raw_i / max_raw) * weight_i / Σ weight_i * 100 )
//! ```

mod criteria;
pub mod monitor;

pub use criteria::{standard_criteria, ScoreCriterion};
pub use monitor::{ScoringMonitor, ScoringProgress};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Input range for raw criterion scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    /// Committee matrix: 0 not met, 1 partially, 2 well, 3 excellently.
    #[default]
    Matrix,
    /// Slider form: 0 to 100.
    Slider,
}

impl ScoreScale {
    pub const fn max_raw(self) -> i32 {
        match self {
            ScoreScale::Matrix => 3,
            ScoreScale::Slider => 100,
        }
    }

    pub fn contains(self, raw: i32) -> bool {
        (0..=self.max_raw()).contains(&raw)
    }

    fn clamp(self, raw: i32) -> i32 {
        raw.clamp(0, self.max_raw())
    }
}

/// Stateless scorer holding the rubric and scale.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    criteria: Vec<ScoreCriterion>,
    scale: ScoreScale,
}

impl ScoringEngine {
    pub fn new(criteria: Vec<ScoreCriterion>, scale: ScoreScale) -> Self {
        Self { criteria, scale }
    }

    /// Standard rubric on the 0-3 matrix scale.
    pub fn standard() -> Self {
        Self::new(standard_criteria(), ScoreScale::Matrix)
    }

    pub fn criteria(&self) -> &[ScoreCriterion] {
        &self.criteria
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }

    pub fn criterion(&self, id: &str) -> Option<&ScoreCriterion> {
        self.criteria.iter().find(|criterion| criterion.id == id)
    }

    /// Score a breakdown. Missing criteria count as 0 and out-of-range values are
    /// clamped to the scale; entries for unknown criteria are ignored.
    pub fn score(&self, breakdown: &BTreeMap<String, i32>) -> ScoreTotals {
        let max_raw = f64::from(self.scale.max_raw());
        let weight_sum: u64 = self.criteria.iter().map(|c| u64::from(c.weight)).sum();

        let mut raw_total: i64 = 0;
        let mut weighted_sum = 0.0_f64;
        let mut components = Vec::with_capacity(self.criteria.len());

        for criterion in &self.criteria {
            let submitted = breakdown.get(&criterion.id).copied().unwrap_or(0);
            let raw = self.scale.clamp(submitted);
            raw_total += i64::from(raw);

            let normalized = f64::from(raw) / max_raw;
            let weighted = normalized * f64::from(criterion.weight);
            weighted_sum += weighted;

            let share = if weight_sum == 0 {
                0.0
            } else {
                weighted / weight_sum as f64 * 100.0
            };

            components.push(CriterionContribution {
                criterion_id: criterion.id.clone(),
                raw,
                clamped: raw != submitted,
                weight: criterion.weight,
                points: share,
            });
        }

        let weighted_total = if weight_sum == 0 {
            0
        } else {
            (weighted_sum / weight_sum as f64 * 100.0)
                .round()
                .clamp(0.0, 100.0) as u8
        };

        ScoreTotals {
            raw_total,
            raw_maximum: i64::from(self.scale.max_raw()) * self.criteria.len() as i64,
            weighted_total,
            components,
        }
    }

    pub fn weighted_total(&self, breakdown: &BTreeMap<String, i32>) -> u8 {
        self.score(breakdown).weighted_total
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Per-criterion share of the weighted total, kept so scorers can audit the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionContribution {
    pub criterion_id: String,
    pub raw: i32,
    pub clamped: bool,
    pub weight: u32,
    /// Percentage points contributed before rounding.
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTotals {
    pub raw_total: i64,
    pub raw_maximum: i64,
    pub weighted_total: u8,
    pub components: Vec<CriterionContribution>,
}
