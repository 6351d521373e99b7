use metrics_exporter_prometheus::PrometheusHandle;
use pb_portal::committee::{RepositoryError, ScoreRepository};
use pb_portal::domain::{ApplicationId, Score};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local score store keyed by score document id.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreRepository {
    scores: Arc<Mutex<HashMap<String, Score>>>,
}

impl InMemoryScoreRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Score>>, RepositoryError> {
        self.scores
            .lock()
            .map_err(|_| RepositoryError::Unavailable("score store lock poisoned".to_string()))
    }
}

impl ScoreRepository for InMemoryScoreRepository {
    fn upsert(&self, score: Score) -> Result<Score, RepositoryError> {
        let mut guard = self.lock()?;
        guard.insert(score.id.clone(), score.clone());
        Ok(score)
    }

    fn fetch(
        &self,
        app_id: &ApplicationId,
        scorer_id: &str,
    ) -> Result<Option<Score>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(&Score::document_id(app_id, scorer_id)).cloned())
    }

    fn list_for_application(&self, app_id: &ApplicationId) -> Result<Vec<Score>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .values()
            .filter(|score| &score.app_id == app_id)
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<Score>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }
}

pub(crate) fn parse_reach(raw: &str) -> Result<u64, String> {
    raw.trim()
        .replace(',', "")
        .parse::<u64>()
        .map_err(|err| format!("failed to parse '{raw}' as a reach figure ({err})"))
}
