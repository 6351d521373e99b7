use serde::Serialize;

use super::{FinancialAggregator, FinancialRecord};
use crate::domain::{ApplicationId, ApplicationSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityImpact {
    pub category: String,
    pub current_spend: f64,
    pub new_spend: f64,
}

/// Projected effect of approving one application. Nothing is written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingSimulation {
    pub application_id: ApplicationId,
    pub area: String,
    pub amount_requested: f64,
    pub remaining_before_approval: f64,
    pub remaining_after_approval: f64,
    pub exceeds_budget: bool,
    pub priority_impact: PriorityImpact,
}

impl FinancialAggregator {
    pub fn simulate(
        &self,
        candidate: &ApplicationSummary,
        applications: &[ApplicationSummary],
        record: Option<&FinancialRecord>,
    ) -> FundingSimulation {
        let budget = self.effective_budget(record);
        let spend = self.effective_spend(applications, record);
        let remaining = budget.get(&candidate.area).copied().unwrap_or(0.0)
            - spend.get(&candidate.area).copied().unwrap_or(0.0);
        let remaining_after_approval = remaining - candidate.amount_requested;

        let category = candidate.priority_or_default().to_string();
        let current_spend = self
            .spend_by_priority(applications)
            .get(&category)
            .copied()
            .unwrap_or(0.0);

        tracing::debug!(
            application = %candidate.id,
            area = %candidate.area,
            remaining,
            remaining_after_approval,
            "simulated funding decision"
        );

        FundingSimulation {
            application_id: candidate.id.clone(),
            area: candidate.area.clone(),
            amount_requested: candidate.amount_requested,
            remaining_before_approval: remaining,
            remaining_after_approval,
            exceeds_budget: remaining_after_approval < 0.0,
            priority_impact: PriorityImpact {
                new_spend: current_spend + candidate.amount_requested,
                current_spend,
                category,
            },
        }
    }

    /// Simulate an application already in `applications`; `None` for unknown ids.
    pub fn simulate_by_id(
        &self,
        id: &ApplicationId,
        applications: &[ApplicationSummary],
        record: Option<&FinancialRecord>,
    ) -> Option<FundingSimulation> {
        applications
            .iter()
            .find(|app| &app.id == id)
            .map(|candidate| self.simulate(candidate, applications, record))
    }
}
