use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use pb_portal::coefficient::{
    format_boost, format_factor, tally_votes, CoefficientSettings, CoefficientTier, PublicVote,
    VoteTally,
};
use pb_portal::committee::{committee_router, CommitteeScoringService, ScoreRepository};
use pb_portal::domain::{ApplicationId, ApplicationSummary};
use pb_portal::error::AppError;
use pb_portal::finance::{
    BudgetConfig, FinanceScope, FinancialAggregator, FinancialRecord, FinancialSummary,
};
use pb_portal::roles::Role;
use pb_portal::scoring::{standard_criteria, ScoreScale, ScoreTotals, ScoringEngine};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScorePreviewRequest {
    pub(crate) breakdown: BTreeMap<String, i32>,
    #[serde(default)]
    pub(crate) scale: ScoreScale,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TierRequest {
    pub(crate) reach: u64,
    #[serde(default)]
    pub(crate) raw_votes: Option<u64>,
    #[serde(default)]
    pub(crate) settings: Option<CoefficientSettings>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TierResponse {
    pub(crate) reach: u64,
    pub(crate) tier: CoefficientTier,
    pub(crate) label: String,
    pub(crate) factor: f64,
    pub(crate) factor_display: String,
    pub(crate) boost: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) adjusted_votes: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TallyRequest {
    pub(crate) votes: Vec<PublicVote>,
    #[serde(default)]
    pub(crate) reach: BTreeMap<ApplicationId, u64>,
    #[serde(default)]
    pub(crate) settings: Option<CoefficientSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FinanceRequest {
    pub(crate) applications: Vec<ApplicationSummary>,
    #[serde(default)]
    pub(crate) record: Option<FinancialRecord>,
    #[serde(default)]
    pub(crate) budget: Option<BudgetConfig>,
    #[serde(default)]
    pub(crate) viewer_role: Option<String>,
    #[serde(default)]
    pub(crate) viewer_area: Option<String>,
}

impl FinanceRequest {
    fn aggregator(&self) -> FinancialAggregator {
        FinancialAggregator::new(self.budget.clone().unwrap_or_default())
    }

    fn scope(&self) -> Result<FinanceScope, AppError> {
        let role = match self.viewer_role.as_deref() {
            Some(raw) => Role::normalize(raw)?,
            None => Role::Admin,
        };
        Ok(FinanceScope::for_viewer(role, self.viewer_area.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimulationRequest {
    pub(crate) application_id: ApplicationId,
    #[serde(flatten)]
    pub(crate) finance: FinanceRequest,
}

pub(crate) fn with_portal_routes<R>(service: Arc<CommitteeScoringService<R>>) -> axum::Router
where
    R: ScoreRepository + 'static,
{
    committee_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/scoring/preview",
            axum::routing::post(score_preview_endpoint),
        )
        .route(
            "/api/v1/coefficients/tier",
            axum::routing::post(tier_endpoint),
        )
        .route(
            "/api/v1/coefficients/settings/validate",
            axum::routing::post(validate_settings_endpoint),
        )
        .route("/api/v1/votes/tally", axum::routing::post(tally_endpoint))
        .route(
            "/api/v1/finance/summary",
            axum::routing::post(finance_summary_endpoint),
        )
        .route(
            "/api/v1/finance/simulate",
            axum::routing::post(finance_simulation_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_preview_endpoint(
    Json(payload): Json<ScorePreviewRequest>,
) -> Json<ScoreTotals> {
    let engine = ScoringEngine::new(standard_criteria(), payload.scale);
    Json(engine.score(&payload.breakdown))
}

pub(crate) async fn tier_endpoint(Json(payload): Json<TierRequest>) -> Json<TierResponse> {
    let settings = payload.settings.unwrap_or_default();
    let assessment = settings.assess(payload.reach);

    Json(TierResponse {
        reach: assessment.reach,
        tier: assessment.tier,
        label: settings.tier_label(assessment.tier),
        factor: assessment.factor,
        factor_display: format_factor(assessment.factor),
        boost: format_boost(assessment.factor),
        adjusted_votes: payload
            .raw_votes
            .map(|votes| settings.adjusted_votes(votes, payload.reach)),
    })
}

pub(crate) async fn validate_settings_endpoint(
    Json(settings): Json<CoefficientSettings>,
) -> Result<Json<serde_json::Value>, AppError> {
    settings.validate()?;
    Ok(Json(json!({ "valid": true })))
}

pub(crate) async fn tally_endpoint(Json(payload): Json<TallyRequest>) -> Json<Vec<VoteTally>> {
    let settings = payload.settings.unwrap_or_default();
    Json(tally_votes(&payload.votes, &payload.reach, &settings))
}

pub(crate) async fn finance_summary_endpoint(
    Json(payload): Json<FinanceRequest>,
) -> Result<Json<FinancialSummary>, AppError> {
    let scope = payload.scope()?;
    let summary = payload.aggregator().summary(
        &payload.applications,
        payload.record.as_ref(),
        &scope,
    );
    Ok(Json(summary))
}

pub(crate) async fn finance_simulation_endpoint(
    Json(payload): Json<SimulationRequest>,
) -> axum::response::Response {
    let finance = &payload.finance;
    match finance.aggregator().simulate_by_id(
        &payload.application_id,
        &finance.applications,
        finance.record.as_ref(),
    ) {
        Some(simulation) => (StatusCode::OK, Json(simulation)).into_response(),
        None => {
            let body = json!({
                "error": format!("application {} not found", payload.application_id),
            });
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    }
}
