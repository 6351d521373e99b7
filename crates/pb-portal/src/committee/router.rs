use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::domain::ScoreSubmission;
use super::repository::{RepositoryError, ScoreRepository};
use super::service::{CommitteeScoringService, ScoringServiceError};
use crate::domain::ApplicationId;
use crate::error::AppError;
use crate::roles::Role;

/// Header carrying the caller's role, set by the portal's auth layer.
pub const ROLE_HEADER: &str = "x-portal-role";

/// Router exposing score submission and lookup.
pub fn committee_router<R>(service: Arc<CommitteeScoringService<R>>) -> Router
where
    R: ScoreRepository + 'static,
{
    Router::new()
        .route("/api/v1/scores", post(submit_handler::<R>))
        .route(
            "/api/v1/applications/:application_id/scores",
            get(list_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/scores/:scorer_id",
            get(score_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<CommitteeScoringService<R>>>,
    headers: HeaderMap,
    axum::Json(submission): axum::Json<ScoreSubmission>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    let role = match caller_role(&headers) {
        Ok(role) => role,
        Err(response) => return response,
    };

    match service.submit(submission, role) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<CommitteeScoringService<R>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    if let Err(response) = restricted_viewer(&headers) {
        return response;
    }
    match service.scores_for(&ApplicationId(application_id)) {
        Ok(scores) => (StatusCode::OK, axum::Json(scores)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<CommitteeScoringService<R>>>,
    headers: HeaderMap,
    Path((application_id, scorer_id)): Path<(String, String)>,
) -> Response
where
    R: ScoreRepository + 'static,
{
    if let Err(response) = restricted_viewer(&headers) {
        return response;
    }
    match service.get(&ApplicationId(application_id), &scorer_id) {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Role named in [`ROLE_HEADER`]; a missing header is a public caller.
fn caller_role(headers: &HeaderMap) -> Result<Role, Response> {
    let raw_role = headers
        .get(ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(Role::Public.label());
    Role::normalize(raw_role).map_err(|error| AppError::from(error).into_response())
}

/// Committee scores and notes are only visible to roles with `view_restricted`.
fn restricted_viewer(headers: &HeaderMap) -> Result<Role, Response> {
    let role = caller_role(headers)?;
    if role.permissions().view_restricted {
        Ok(role)
    } else {
        Err(error_response(ScoringServiceError::RestrictedView { role }))
    }
}

fn error_response(error: ScoringServiceError) -> Response {
    if let ScoringServiceError::Repository(RepositoryError::Unavailable(reason)) = &error {
        tracing::error!(%reason, "score repository failure");
    }
    AppError::from(error).into_response()
}
