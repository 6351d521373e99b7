//! Budget and spend aggregation for the financial dashboard.
//!
//! Spend is derived from funded applications unless the round's stored record
//! carries an explicit per-area spend map. Nothing here fails: overspent areas
//! simply report a negative remaining figure.

pub mod import;
pub mod simulation;

pub use import::{ApplicationImporter, ImportError};
pub use simulation::{FundingSimulation, PriorityImpact};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ApplicationStatus, ApplicationSummary};
use crate::roles::Role;

pub const DEFAULT_AREA_BUDGET: f64 = 10_000.0;

pub const STANDARD_AREAS: [&str; 3] = [
    "Blaenavon",
    "Thornhill & Upper Cwmbran",
    "Trevethin, Penygarn & St. Cadocs",
];

pub const STANDARD_PRIORITIES: [&str; 7] = [
    "Youth Services",
    "Health & Wellbeing",
    "Community Safety",
    "Environment",
    "Transport",
    "Heritage & Tourism",
    "Other",
];

/// Configured areas with their allocation, and the priority categories shown
/// on the dashboard even before anything is funded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetConfig {
    pub budget_by_area: BTreeMap<String, f64>,
    pub priority_categories: Vec<String>,
}

impl BudgetConfig {
    pub fn standard() -> Self {
        Self {
            budget_by_area: STANDARD_AREAS
                .iter()
                .map(|area| (area.to_string(), DEFAULT_AREA_BUDGET))
                .collect(),
            priority_categories: STANDARD_PRIORITIES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stored financial figures for one funding round. Every field is optional;
/// absent maps fall back to figures derived from applications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialRecord {
    pub round_id: String,
    pub total_funding: Option<f64>,
    pub total_spent: Option<f64>,
    pub remaining_pot: Option<f64>,
    pub budget_by_area: Option<BTreeMap<String, f64>>,
    pub spend_by_area: Option<BTreeMap<String, f64>>,
    pub spend_by_priority: Option<BTreeMap<String, f64>>,
}

impl FinancialRecord {
    pub fn from_maps(
        round_id: impl Into<String>,
        budget_by_area: BTreeMap<String, f64>,
        spend_by_area: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            round_id: round_id.into(),
            budget_by_area: Some(budget_by_area),
            spend_by_area: Some(spend_by_area),
            ..Self::default()
        }
        .with_recomputed_totals()
    }

    fn stored_spend(&self) -> Option<&BTreeMap<String, f64>> {
        self.spend_by_area.as_ref().filter(|spend| !spend.is_empty())
    }

    /// Recompute the scalar totals from the per-area maps, as done on save.
    pub fn with_recomputed_totals(mut self) -> Self {
        if let Some(budget) = &self.budget_by_area {
            self.total_funding = Some(sum(budget));
        }
        if let Some(spend) = &self.spend_by_area {
            self.total_spent = Some(sum(spend));
        }
        if let (Some(funding), Some(spent)) = (self.total_funding, self.total_spent) {
            self.remaining_pot = Some(funding - spent);
        }
        self
    }
}

/// Which areas a dashboard viewer may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinanceScope {
    All,
    Area(String),
}

impl FinanceScope {
    /// Admins see every area; anyone else with an assigned area sees only that area.
    pub fn for_viewer(role: Role, area: Option<&str>) -> Self {
        match (role, area) {
            (Role::Admin, _) | (_, None) => FinanceScope::All,
            (_, Some(area)) => FinanceScope::Area(area.to_string()),
        }
    }

    fn includes(&self, area: &str) -> bool {
        match self {
            FinanceScope::All => true,
            FinanceScope::Area(own) => own == area,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaFinancials {
    pub area: String,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
    pub project_count: usize,
    pub pending_requests: f64,
}

impl AreaFinancials {
    pub fn over_budget(&self) -> bool {
        self.spent > self.allocated
    }

    /// Spent as a share of the allocation; 0 for unallocated areas.
    pub fn percent_spent(&self) -> f64 {
        if self.allocated > 0.0 {
            self.spent / self.allocated * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTotals {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining_pot: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub round_id: String,
    pub totals: FinancialTotals,
    pub over_budget: bool,
    pub areas: Vec<AreaFinancials>,
    pub spend_by_priority: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FinancialAggregator {
    config: BudgetConfig,
}

impl FinancialAggregator {
    pub fn new(config: BudgetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// Funded spend per area, with every configured area present.
    pub fn spend_by_area(&self, applications: &[ApplicationSummary]) -> BTreeMap<String, f64> {
        let mut spend: BTreeMap<String, f64> = self
            .config
            .budget_by_area
            .keys()
            .map(|area| (area.clone(), 0.0))
            .collect();

        for app in applications.iter().filter(|app| app.is_funded()) {
            *spend.entry(app.area.clone()).or_insert(0.0) += app.amount_requested;
        }
        spend
    }

    /// Funded spend per priority category; applications without one count as `Other`.
    pub fn spend_by_priority(&self, applications: &[ApplicationSummary]) -> BTreeMap<String, f64> {
        let mut spend: BTreeMap<String, f64> = self
            .config
            .priority_categories
            .iter()
            .map(|category| (category.clone(), 0.0))
            .collect();

        for app in applications.iter().filter(|app| app.is_funded()) {
            *spend
                .entry(app.priority_or_default().to_string())
                .or_insert(0.0) += app.amount_requested;
        }
        spend
    }

    pub fn effective_budget(&self, record: Option<&FinancialRecord>) -> BTreeMap<String, f64> {
        record
            .and_then(|record| record.budget_by_area.clone())
            .unwrap_or_else(|| self.config.budget_by_area.clone())
    }

    /// Stored spend wins over computed spend when the stored map is non-empty.
    pub fn effective_spend(
        &self,
        applications: &[ApplicationSummary],
        record: Option<&FinancialRecord>,
    ) -> BTreeMap<String, f64> {
        match record.and_then(FinancialRecord::stored_spend) {
            Some(stored) => stored.clone(),
            None => self.spend_by_area(applications),
        }
    }

    pub fn area_financials(
        &self,
        applications: &[ApplicationSummary],
        record: Option<&FinancialRecord>,
        scope: &FinanceScope,
    ) -> Vec<AreaFinancials> {
        let budget = self.effective_budget(record);
        let spend = self.effective_spend(applications, record);
        let remaining = remaining_by_area(&budget, &spend);

        remaining
            .into_iter()
            .filter(|(area, _)| scope.includes(area))
            .map(|(area, remaining)| {
                let mut project_count = 0;
                let mut pending_requests = 0.0;
                for app in applications.iter().filter(|app| app.area == area) {
                    match app.status {
                        ApplicationStatus::Funded => project_count += 1,
                        status if status.awaiting_committee() => {
                            pending_requests += app.amount_requested
                        }
                        _ => {}
                    }
                }

                AreaFinancials {
                    allocated: budget.get(&area).copied().unwrap_or(0.0),
                    spent: spend.get(&area).copied().unwrap_or(0.0),
                    remaining,
                    project_count,
                    pending_requests,
                    area,
                }
            })
            .collect()
    }

    /// Round totals. Per-area maps win when present; stored scalars are the fallback.
    pub fn totals(
        &self,
        applications: &[ApplicationSummary],
        record: Option<&FinancialRecord>,
    ) -> FinancialTotals {
        let derived_budget = sum(&self.effective_budget(record));
        let derived_spent = sum(&self.effective_spend(applications, record));

        let total_budget = match record {
            Some(record) if record.budget_by_area.is_some() => derived_budget,
            Some(record) => stored_total(record.total_funding).unwrap_or(derived_budget),
            None => derived_budget,
        };
        let total_spent = match record {
            Some(record) if record.stored_spend().is_some() => derived_spent,
            Some(record) => stored_total(record.total_spent).unwrap_or(derived_spent),
            None => derived_spent,
        };

        FinancialTotals {
            total_budget,
            total_spent,
            remaining_pot: total_budget - total_spent,
        }
    }

    pub fn summary(
        &self,
        applications: &[ApplicationSummary],
        record: Option<&FinancialRecord>,
        scope: &FinanceScope,
    ) -> FinancialSummary {
        let totals = self.totals(applications, record);
        FinancialSummary {
            round_id: record.map(|r| r.round_id.clone()).unwrap_or_default(),
            over_budget: totals.remaining_pot < 0.0,
            totals,
            areas: self.area_financials(applications, record, scope),
            spend_by_priority: self.spend_by_priority(applications),
        }
    }

    /// The record an admin save would persist: stored maps kept, totals recomputed.
    pub fn reconcile(
        &self,
        applications: &[ApplicationSummary],
        record: &FinancialRecord,
    ) -> FinancialRecord {
        FinancialRecord {
            round_id: record.round_id.clone(),
            budget_by_area: Some(self.effective_budget(Some(record))),
            spend_by_area: Some(self.effective_spend(applications, Some(record))),
            spend_by_priority: Some(
                record
                    .spend_by_priority
                    .clone()
                    .unwrap_or_else(|| self.spend_by_priority(applications)),
            ),
            ..FinancialRecord::default()
        }
        .with_recomputed_totals()
    }
}

/// Budget minus spend for every area named in either map; missing entries are 0.
pub fn remaining_by_area(
    budget: &BTreeMap<String, f64>,
    spend: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    budget
        .keys()
        .chain(spend.keys())
        .map(|area| {
            let allocated = budget.get(area).copied().unwrap_or(0.0);
            let spent = spend.get(area).copied().unwrap_or(0.0);
            (area.clone(), allocated - spent)
        })
        .collect()
}

/// A stored scalar of zero means it was never filled in.
fn stored_total(value: Option<f64>) -> Option<f64> {
    value.filter(|total| *total != 0.0)
}

fn sum(values: &BTreeMap<String, f64>) -> f64 {
    values.values().sum()
}
