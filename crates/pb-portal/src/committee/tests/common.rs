use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::committee::domain::ScoreSubmission;
use crate::committee::repository::{RepositoryError, ScoreRepository};
use crate::committee::{committee_router, CommitteeScoringService};
use crate::config::PortalConfig;
use crate::domain::{ApplicationId, Score};
use crate::scoring::ScoringEngine;

pub(super) fn app_id() -> ApplicationId {
    ApplicationId("app_PB042".to_string())
}

pub(super) fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn full_marks() -> BTreeMap<String, i32> {
    ScoringEngine::standard()
        .criteria()
        .iter()
        .map(|criterion| (criterion.id.clone(), 3))
        .collect()
}

pub(super) fn submission(is_final: bool) -> ScoreSubmission {
    ScoreSubmission {
        app_id: app_id(),
        scorer_id: "comm_bln_01".to_string(),
        scorer_name: "Louise White".to_string(),
        breakdown: full_marks(),
        notes: BTreeMap::from([(
            "budget_value".to_string(),
            "Quotes attached for every line.".to_string(),
        )]),
        is_final,
    }
}

pub(super) fn open_portal() -> PortalConfig {
    PortalConfig::default()
}

pub(super) fn closed_portal() -> PortalConfig {
    PortalConfig {
        scoring_open: false,
        ..PortalConfig::default()
    }
}

pub(super) fn build_service(
    portal: &PortalConfig,
) -> (CommitteeScoringService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        CommitteeScoringService::new(repository.clone(), ScoringEngine::standard(), portal);
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) scores: Arc<Mutex<HashMap<String, Score>>>,
}

impl ScoreRepository for MemoryRepository {
    fn upsert(&self, score: Score) -> Result<Score, RepositoryError> {
        let mut guard = self.scores.lock().expect("repository mutex poisoned");
        guard.insert(score.id.clone(), score.clone());
        Ok(score)
    }

    fn fetch(
        &self,
        app_id: &ApplicationId,
        scorer_id: &str,
    ) -> Result<Option<Score>, RepositoryError> {
        let guard = self.scores.lock().expect("repository mutex poisoned");
        Ok(guard.get(&Score::document_id(app_id, scorer_id)).cloned())
    }

    fn list_for_application(&self, app_id: &ApplicationId) -> Result<Vec<Score>, RepositoryError> {
        let guard = self.scores.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|score| &score.app_id == app_id)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Score>, RepositoryError> {
        let guard = self.scores.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl ScoreRepository for UnavailableRepository {
    fn upsert(&self, _score: Score) -> Result<Score, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn fetch(
        &self,
        _app_id: &ApplicationId,
        _scorer_id: &str,
    ) -> Result<Option<Score>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn list_for_application(&self, _app_id: &ApplicationId) -> Result<Vec<Score>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<Score>, RepositoryError> {
        Err(RepositoryError::Unavailable("document store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: CommitteeScoringService<MemoryRepository>,
) -> axum::Router {
    committee_router(Arc::new(service))
}
