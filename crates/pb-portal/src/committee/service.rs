use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::ScoreSubmission;
use super::repository::{RepositoryError, ScoreRepository};
use crate::config::PortalConfig;
use crate::domain::{ApplicationId, ApplicationSummary, PortalUser, Score};
use crate::roles::Role;
use crate::scoring::{ScoringEngine, ScoringMonitor, ScoringProgress};

/// Service composing the scoring engine with score storage.
pub struct CommitteeScoringService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
    monitor: ScoringMonitor,
    scoring_open: bool,
}

impl<R> CommitteeScoringService<R>
where
    R: ScoreRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: ScoringEngine, portal: &PortalConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            monitor: ScoringMonitor::new(portal.scoring_threshold),
            scoring_open: portal.scoring_open,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn scoring_open(&self) -> bool {
        self.scoring_open
    }

    pub fn submit(
        &self,
        submission: ScoreSubmission,
        role: Role,
    ) -> Result<Score, ScoringServiceError> {
        self.submit_at(submission, role, Utc::now())
    }

    /// Validate and persist a submission, stamping it with `now`.
    pub fn submit_at(
        &self,
        submission: ScoreSubmission,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Score, ScoringServiceError> {
        if !role.permissions().can_score {
            return Err(ScoringServiceError::Forbidden { role });
        }
        if !self.scoring_open && role != Role::Admin {
            return Err(ScoringServiceError::ScoringClosed);
        }
        self.validate_breakdown(&submission)?;

        let existing = self
            .repository
            .fetch(&submission.app_id, &submission.scorer_id)?;
        if existing.as_ref().is_some_and(|score| score.is_final) {
            return Err(ScoringServiceError::AlreadyFinal {
                app_id: submission.app_id,
                scorer_id: submission.scorer_id,
            });
        }

        let weighted_total = self.engine.weighted_total(&submission.breakdown);
        let created_at = existing.map(|score| score.created_at).unwrap_or(now);

        let score = Score {
            id: Score::document_id(&submission.app_id, &submission.scorer_id),
            app_id: submission.app_id,
            scorer_id: submission.scorer_id,
            scorer_name: submission.scorer_name,
            breakdown: submission.breakdown,
            weighted_total,
            notes: submission.notes,
            is_final: submission.is_final,
            created_at,
            updated_at: now,
        };

        let stored = self.repository.upsert(score)?;
        tracing::info!(
            score_id = %stored.id,
            weighted_total = stored.weighted_total,
            is_final = stored.is_final,
            "committee score saved"
        );
        Ok(stored)
    }

    fn validate_breakdown(&self, submission: &ScoreSubmission) -> Result<(), ScoringServiceError> {
        let scale = self.engine.scale();
        for (criterion, &value) in &submission.breakdown {
            if self.engine.criterion(criterion).is_none() {
                return Err(ScoringServiceError::UnknownCriterion {
                    criterion: criterion.clone(),
                });
            }
            if !scale.contains(value) {
                return Err(ScoringServiceError::OutOfRange {
                    criterion: criterion.clone(),
                    value,
                    max: scale.max_raw(),
                });
            }
        }
        Ok(())
    }

    pub fn scores_for(&self, app_id: &ApplicationId) -> Result<Vec<Score>, ScoringServiceError> {
        let mut scores = self.repository.list_for_application(app_id)?;
        scores.sort_by(|a, b| a.scorer_id.cmp(&b.scorer_id));
        Ok(scores)
    }

    pub fn get(&self, app_id: &ApplicationId, scorer_id: &str) -> Result<Score, ScoringServiceError> {
        let score = self
            .repository
            .fetch(app_id, scorer_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(score)
    }

    /// Committee progress over the stored scores.
    pub fn progress(
        &self,
        applications: &[ApplicationSummary],
        users: &[PortalUser],
        area_filter: Option<&str>,
    ) -> Result<Vec<ScoringProgress>, ScoringServiceError> {
        let scores = self.repository.list_all()?;
        Ok(self
            .monitor
            .progress(applications, users, &scores, area_filter))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("role `{role}` may not score applications")]
    Forbidden { role: Role },
    #[error("role `{role}` may not view committee scores")]
    RestrictedView { role: Role },
    #[error("scoring is closed for this round")]
    ScoringClosed,
    #[error("unknown criterion `{criterion}`")]
    UnknownCriterion { criterion: String },
    #[error("score {value} for `{criterion}` is outside 0..={max}")]
    OutOfRange {
        criterion: String,
        value: i32,
        max: i32,
    },
    #[error("score for application {app_id} by {scorer_id} is final")]
    AlreadyFinal {
        app_id: ApplicationId,
        scorer_id: String,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
