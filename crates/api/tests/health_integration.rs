//! Integration tests for health probe endpoints.

mod common;

use axum::http::StatusCode;
use common::{create_test_app, get_request, parse_response_body};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check_without_database_reports_healthy() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body.get("version").is_some());
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/api/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/api/health/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_response_body(response).await["status"], "ready");
}
