use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScoreRepository};
use crate::routes::with_portal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pb_portal::committee::CommitteeScoringService;
use pb_portal::config::AppConfig;
use pb_portal::error::AppError;
use pb_portal::scoring::ScoringEngine;
use pb_portal::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.scoring_closed {
        config.portal.scoring_open = false;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryScoreRepository::default());
    let scoring_service = Arc::new(CommitteeScoringService::new(
        repository,
        ScoringEngine::standard(),
        &config.portal,
    ));

    let app = with_portal_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        scoring_open = config.portal.scoring_open,
        threshold = config.portal.scoring_threshold,
        round = config.portal.active_round.as_deref().unwrap_or("unset"),
        "participatory budgeting portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
