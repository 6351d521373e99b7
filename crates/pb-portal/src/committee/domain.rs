use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ApplicationId;

/// A committee member's scoring form as posted from the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub app_id: ApplicationId,
    pub scorer_id: String,
    #[serde(default)]
    pub scorer_name: String,
    pub breakdown: BTreeMap<String, i32>,
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
    /// Final scores lock the (application, scorer) pair.
    #[serde(default)]
    pub is_final: bool,
}
