use crate::domain::{ApplicationId, Score};

/// Score storage keyed on the (application, scorer) pair.
pub trait ScoreRepository: Send + Sync {
    /// Insert or replace the score stored under `score.id`.
    fn upsert(&self, score: Score) -> Result<Score, RepositoryError>;
    fn fetch(
        &self,
        app_id: &ApplicationId,
        scorer_id: &str,
    ) -> Result<Option<Score>, RepositoryError>;
    fn list_for_application(&self, app_id: &ApplicationId) -> Result<Vec<Score>, RepositoryError>;
    fn list_all(&self) -> Result<Vec<Score>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("score not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
