//! Reach coefficients for public digital voting.
//!
//! Organisations declare a reach figure; the figure picks a tier and the tier's
//! factor boosts raw vote counts so small groups are not outvoted purely by
//! audience size.

pub mod tally;

pub use tally::{tally_votes, PublicVote, VoteChannel, VoteTally};

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientTier {
    Small,
    Medium,
    Large,
}

impl CoefficientTier {
    pub const ALL: [CoefficientTier; 3] = [Self::Small, Self::Medium, Self::Large];

    pub const fn label(self) -> &'static str {
        match self {
            CoefficientTier::Small => "Small",
            CoefficientTier::Medium => "Medium",
            CoefficientTier::Large => "Large",
        }
    }
}

impl fmt::Display for CoefficientTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundedTier {
    pub max_reach: u64,
    pub factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTier {
    pub factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTiers {
    pub small: BoundedTier,
    pub medium: BoundedTier,
    pub large: OpenTier,
}

/// Per-round coefficient configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientSettings {
    pub enabled: bool,
    /// Whether votes cast at physical events are also adjusted. Read by the tally.
    pub apply_to_in_person: bool,
    pub tiers: CoefficientTiers,
}

impl Default for CoefficientSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            apply_to_in_person: false,
            tiers: CoefficientTiers {
                small: BoundedTier {
                    max_reach: 50,
                    factor: 1.5,
                },
                medium: BoundedTier {
                    max_reach: 200,
                    factor: 1.2,
                },
                large: OpenTier { factor: 1.0 },
            },
        }
    }
}

impl CoefficientSettings {
    pub const MIN_FACTOR: f64 = 1.0;
    pub const MAX_FACTOR: f64 = 2.0;

    /// Classify a reach figure. Boundaries are inclusive at the top of each tier.
    pub fn tier_for(&self, reach: u64) -> CoefficientTier {
        if reach <= self.tiers.small.max_reach {
            CoefficientTier::Small
        } else if reach <= self.tiers.medium.max_reach {
            CoefficientTier::Medium
        } else {
            CoefficientTier::Large
        }
    }

    /// Stored factor for a tier, ignoring `enabled`.
    pub fn configured_factor(&self, tier: CoefficientTier) -> f64 {
        match tier {
            CoefficientTier::Small => self.tiers.small.factor,
            CoefficientTier::Medium => self.tiers.medium.factor,
            CoefficientTier::Large => self.tiers.large.factor,
        }
    }

    /// Factor applied to votes; 1 for every tier while coefficients are disabled.
    pub fn factor(&self, tier: CoefficientTier) -> f64 {
        if self.enabled {
            self.configured_factor(tier)
        } else {
            1.0
        }
    }

    pub fn assess(&self, reach: u64) -> CoefficientAssessment {
        let tier = self.tier_for(reach);
        CoefficientAssessment {
            reach,
            tier,
            factor: self.factor(tier),
        }
    }

    /// Raw votes scaled by the reach tier, rounded to one decimal place.
    pub fn adjusted_votes(&self, raw_votes: u64, reach: u64) -> f64 {
        adjust(raw_votes as f64, self.factor(self.tier_for(reach)))
    }

    /// Human-readable reach range, e.g. `Medium (51-200)`.
    pub fn tier_label(&self, tier: CoefficientTier) -> String {
        match tier {
            CoefficientTier::Small => format!("Small (0-{})", self.tiers.small.max_reach),
            CoefficientTier::Medium => format!(
                "Medium ({}-{})",
                self.tiers.small.max_reach.saturating_add(1),
                self.tiers.medium.max_reach
            ),
            CoefficientTier::Large => format!(
                "Large ({}+)",
                self.tiers.medium.max_reach.saturating_add(1)
            ),
        }
    }

    /// Check the tier partition and factor bounds. Calculation never calls this;
    /// it guards settings being saved.
    pub fn validate(&self) -> Result<(), CoefficientSettingsError> {
        let mut problems = Vec::new();

        if self.tiers.small.max_reach >= self.tiers.medium.max_reach {
            problems.push(CoefficientSettingsProblem::InvertedBoundaries {
                small_max_reach: self.tiers.small.max_reach,
                medium_max_reach: self.tiers.medium.max_reach,
            });
        }

        for tier in CoefficientTier::ALL {
            let factor = self.configured_factor(tier);
            if !(Self::MIN_FACTOR..=Self::MAX_FACTOR).contains(&factor) {
                problems.push(CoefficientSettingsProblem::FactorOutOfRange { tier, factor });
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoefficientSettingsError { problems })
        }
    }
}

pub(crate) fn adjust(votes: f64, factor: f64) -> f64 {
    (votes * factor * 10.0).round() / 10.0
}

/// Tier and effective factor for one reach figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientAssessment {
    pub reach: u64,
    pub tier: CoefficientTier,
    pub factor: f64,
}

/// Render a factor as `×1.5`.
pub fn format_factor(factor: f64) -> String {
    format!("×{}", trim_float(factor))
}

/// Render the boost a factor grants, e.g. `+50% boost`.
pub fn format_boost(factor: f64) -> String {
    let percent = ((factor - 1.0) * 100.0).round() as i64;
    if percent == 0 {
        "no boost".to_string()
    } else {
        format!("{percent:+}% boost")
    }
}

fn trim_float(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoefficientSettingsProblem {
    InvertedBoundaries {
        small_max_reach: u64,
        medium_max_reach: u64,
    },
    FactorOutOfRange {
        tier: CoefficientTier,
        factor: f64,
    },
}

impl fmt::Display for CoefficientSettingsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientSettingsProblem::InvertedBoundaries {
                small_max_reach,
                medium_max_reach,
            } => write!(
                f,
                "small tier max reach {small_max_reach} must be below medium tier max reach {medium_max_reach}"
            ),
            CoefficientSettingsProblem::FactorOutOfRange { tier, factor } => write!(
                f,
                "{tier} tier factor {factor} must be between {} and {}",
                CoefficientSettings::MIN_FACTOR,
                CoefficientSettings::MAX_FACTOR
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coefficient settings: {}", summarize(.problems))]
pub struct CoefficientSettingsError {
    pub problems: Vec<CoefficientSettingsProblem>,
}

fn summarize(problems: &[CoefficientSettingsProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CoefficientSettings {
        CoefficientSettings::default()
    }

    #[test]
    fn zero_reach_is_small() {
        assert_eq!(settings().tier_for(0), CoefficientTier::Small);
    }

    #[test]
    fn boundaries_are_inclusive_at_the_top_of_each_tier() {
        let s = settings();
        assert_eq!(s.tier_for(s.tiers.small.max_reach), CoefficientTier::Small);
        assert_eq!(
            s.tier_for(s.tiers.small.max_reach + 1),
            CoefficientTier::Medium
        );
        assert_eq!(s.tier_for(s.tiers.medium.max_reach), CoefficientTier::Medium);
        assert_eq!(
            s.tier_for(s.tiers.medium.max_reach + 1),
            CoefficientTier::Large
        );
    }

    #[test]
    fn small_tier_boosts_one_hundred_votes_to_one_fifty() {
        let s = settings();
        let assessment = s.assess(50);
        assert_eq!(assessment.tier, CoefficientTier::Small);
        assert_eq!(assessment.factor, 1.5);
        assert_eq!(s.adjusted_votes(100, 50), 150.0);
    }

    #[test]
    fn adjusted_votes_round_to_one_decimal() {
        let mut s = settings();
        s.tiers.medium.factor = 1.25;
        assert_eq!(s.adjusted_votes(7, 120), 8.8);
    }

    #[test]
    fn disabled_coefficients_leave_votes_untouched() {
        let mut s = settings();
        s.enabled = false;
        for reach in [0, 50, 150, 10_000] {
            assert_eq!(s.adjusted_votes(37, reach), 37.0);
        }
        assert_eq!(s.configured_factor(CoefficientTier::Small), 1.5);
        assert_eq!(s.factor(CoefficientTier::Small), 1.0);
    }

    #[test]
    fn labels_describe_reach_ranges() {
        let s = settings();
        assert_eq!(s.tier_label(CoefficientTier::Small), "Small (0-50)");
        assert_eq!(s.tier_label(CoefficientTier::Medium), "Medium (51-200)");
        assert_eq!(s.tier_label(CoefficientTier::Large), "Large (201+)");
        assert_eq!(format_factor(1.5), "×1.5");
        assert_eq!(format_factor(1.0), "×1");
        assert_eq!(format_boost(1.2), "+20% boost");
        assert_eq!(format_boost(1.0), "no boost");
    }

    #[test]
    fn default_settings_validate() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut s = settings();
        s.tiers.small.max_reach = 300;
        s.tiers.large.factor = 0.5;
        s.tiers.small.factor = 2.5;

        let err = s.validate().expect_err("invalid settings");

        assert_eq!(err.problems.len(), 3);
        assert!(matches!(
            err.problems[0],
            CoefficientSettingsProblem::InvertedBoundaries {
                small_max_reach: 300,
                medium_max_reach: 200
            }
        ));
        assert!(err.to_string().contains("Large tier factor 0.5"));
    }

    #[test]
    fn inverted_settings_still_classify_without_panicking() {
        let mut s = settings();
        s.tiers.small.max_reach = 300;
        assert_eq!(s.tier_for(250), CoefficientTier::Small);
        assert_eq!(s.tier_for(301), CoefficientTier::Large);
    }
}
