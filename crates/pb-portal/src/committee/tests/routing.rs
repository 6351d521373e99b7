use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::committee::router::{score_handler, submit_handler};
use crate::committee::{CommitteeScoringService, ROLE_HEADER};
use crate::roles::Role;
use crate::scoring::ScoringEngine;

fn post_score(role: &str, body: Vec<u8>) -> Request<Body> {
    Request::post("/api/v1/scores")
        .header(header::CONTENT_TYPE, "application/json")
        .header(ROLE_HEADER, role)
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_accepts_committee_scores() {
    let (service, _) = build_service(&open_portal());
    let router = router_with_service(service);

    let body = serde_json::to_vec(&submission(false)).expect("serializes");
    let response = router
        .oneshot(post_score("Committee", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["weightedTotal"], 100);
    assert_eq!(payload["id"], "app_PB042_comm_bln_01");
}

#[tokio::test]
async fn submit_route_rejects_unrecognised_roles() {
    let (service, _) = build_service(&open_portal());
    let router = router_with_service(service);

    let body = serde_json::to_vec(&submission(false)).expect("serializes");
    let response = router
        .oneshot(post_score("superuser", body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_handler_defaults_to_public_without_role_header() {
    let (service, _) = build_service(&open_portal());

    let response = submit_handler::<MemoryRepository>(
        State(Arc::new(service)),
        HeaderMap::new(),
        axum::Json(submission(false)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submit_handler_maps_validation_and_conflicts() {
    let (service, _) = build_service(&open_portal());
    let service = Arc::new(service);
    let mut headers = HeaderMap::new();
    headers.insert(ROLE_HEADER, HeaderValue::from_static("committee"));

    let mut invalid = submission(false);
    invalid.breakdown.insert("local_priorities".to_string(), -1);
    let response = submit_handler::<MemoryRepository>(
        State(service.clone()),
        headers.clone(),
        axum::Json(invalid),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    service
        .submit(submission(true), Role::Committee)
        .expect("final score stored");
    let response = submit_handler::<MemoryRepository>(
        State(service),
        headers,
        axum::Json(submission(false)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_route_returns_scores_for_application() {
    let (service, _) = build_service(&open_portal());
    service
        .submit(submission(false), Role::Committee)
        .expect("score stored");
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/applications/app_PB042/scores")
                .header(ROLE_HEADER, "committee")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn score_handler_returns_not_found_for_missing_pair() {
    let (service, _) = build_service(&open_portal());

    let mut headers = HeaderMap::new();
    headers.insert(ROLE_HEADER, HeaderValue::from_static("admin"));

    let response = score_handler::<MemoryRepository>(
        State(Arc::new(service)),
        headers,
        Path(("app_PB042".to_string(), "comm_thn_02".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn get_score(role: Option<&str>) -> Request<Body> {
    let builder = Request::get("/api/v1/applications/app_PB042/scores/comm_bln_01");
    let builder = match role {
        Some(role) => builder.header(ROLE_HEADER, role),
        None => builder,
    };
    builder.body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn score_routes_refuse_public_and_applicant_callers() {
    let (service, _) = build_service(&open_portal());
    service
        .submit(submission(false), Role::Committee)
        .expect("score stored");
    let router = router_with_service(service);

    for role in [Some("public"), Some("applicant"), None] {
        let response = router
            .clone()
            .oneshot(get_score(role))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "role {role:?}");
    }

    let response = router
        .oneshot(
            Request::get("/api/v1/applications/app_PB042/scores")
                .header(ROLE_HEADER, "applicant")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn score_routes_allow_committee_and_admin_callers() {
    let (service, _) = build_service(&open_portal());
    service
        .submit(submission(false), Role::Committee)
        .expect("score stored");
    let router = router_with_service(service);

    for role in ["committee", "Admin"] {
        let response = router
            .clone()
            .oneshot(get_score(Some(role)))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK, "role {role}");
        let payload = read_json_body(response).await;
        assert_eq!(payload["scorerId"], "comm_bln_01");
    }
}

#[tokio::test]
async fn repository_outage_maps_to_internal_error() {
    let service = Arc::new(CommitteeScoringService::new(
        Arc::new(UnavailableRepository),
        ScoringEngine::standard(),
        &open_portal(),
    ));
    let mut headers = HeaderMap::new();
    headers.insert(ROLE_HEADER, HeaderValue::from_static("admin"));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        headers,
        axum::Json(submission(false)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
