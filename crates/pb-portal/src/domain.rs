use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Area label used by projects that deliver across every committee area.
pub const CROSS_AREA: &str = "Cross-Area";

/// Priority bucket for funded projects that never declared one.
pub const DEFAULT_PRIORITY: &str = "Other";

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two sequential application phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Expression of interest.
    Stage1,
    /// Full application.
    Stage2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Draft,
    #[serde(rename = "Submitted-Stage1")]
    SubmittedStage1,
    #[serde(rename = "Rejected-Stage1")]
    RejectedStage1,
    #[serde(rename = "Invited-Stage2")]
    InvitedStage2,
    #[serde(rename = "Submitted-Stage2")]
    SubmittedStage2,
    Funded,
    #[serde(rename = "Not-Funded")]
    NotFunded,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "Draft",
            ApplicationStatus::SubmittedStage1 => "Submitted-Stage1",
            ApplicationStatus::RejectedStage1 => "Rejected-Stage1",
            ApplicationStatus::InvitedStage2 => "Invited-Stage2",
            ApplicationStatus::SubmittedStage2 => "Submitted-Stage2",
            ApplicationStatus::Funded => "Funded",
            ApplicationStatus::NotFunded => "Not-Funded",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "draft" => Some(Self::Draft),
            "submittedstage1" => Some(Self::SubmittedStage1),
            "rejectedstage1" => Some(Self::RejectedStage1),
            "invitedstage2" => Some(Self::InvitedStage2),
            "submittedstage2" => Some(Self::SubmittedStage2),
            "funded" => Some(Self::Funded),
            "notfunded" => Some(Self::NotFunded),
            _ => None,
        }
    }

    pub const fn stage(self) -> Stage {
        match self {
            ApplicationStatus::Draft
            | ApplicationStatus::SubmittedStage1
            | ApplicationStatus::RejectedStage1 => Stage::Stage1,
            ApplicationStatus::InvitedStage2
            | ApplicationStatus::SubmittedStage2
            | ApplicationStatus::Funded
            | ApplicationStatus::NotFunded => Stage::Stage2,
        }
    }

    /// Stage 2 applications still waiting on a committee decision.
    pub const fn awaiting_committee(self) -> bool {
        matches!(
            self,
            ApplicationStatus::InvitedStage2 | ApplicationStatus::SubmittedStage2
        )
    }
}

/// The slice of an application record the calculations need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    #[serde(default, rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub project_title: String,
    pub area: String,
    #[serde(default)]
    pub priority: Option<String>,
    pub amount_requested: f64,
    pub status: ApplicationStatus,
}

impl ApplicationSummary {
    pub fn priority_or_default(&self) -> &str {
        self.priority
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn is_funded(&self) -> bool {
        self.status == ApplicationStatus::Funded
    }
}

/// A portal user as seen by scoring and finance views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalUser {
    pub uid: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub area: Option<String>,
}

/// A committee member's score for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: String,
    pub app_id: ApplicationId,
    pub scorer_id: String,
    pub scorer_name: String,
    pub breakdown: BTreeMap<String, i32>,
    pub weighted_total: u8,
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
    pub is_final: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Score {
    /// Document id keyed on the (application, scorer) pair.
    pub fn document_id(app_id: &ApplicationId, scorer_id: &str) -> String {
        format!("{}_{}", app_id.0, scorer_id)
    }
}
