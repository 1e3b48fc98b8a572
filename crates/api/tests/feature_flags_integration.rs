//! Integration tests for feature flag endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_app, delete_request, get_request, json_request, parse_response_body};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_flag_always_starts_disabled() {
    let app = create_test_app();

    // An `enabled` field in the payload is ignored; flags are never
    // auto-enabled at creation.
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "dark-mode", "description": "UI theme", "enabled": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "dark-mode");
    assert_eq!(body["enabled"], false);
    assert_eq!(body["description"], "UI theme");
}

#[tokio::test]
async fn test_create_duplicate_name_conflicts() {
    let app = create_test_app();
    let payload = json!({"name": "dark-mode"});

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/flags", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(Method::POST, "/api/v1/flags", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "already_exists");
    assert_eq!(body["message"], "Feature Flag with this name already exists!");
}

#[tokio::test]
async fn test_create_overlong_name_is_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "x".repeat(101)}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "name field is invalid.");
}

#[tokio::test]
async fn test_status_toggle_is_visible_after_cached_read() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "dark-mode", "description": "UI theme"}),
        ))
        .await
        .unwrap();

    // Populate the cache with the disabled state.
    let response = app
        .clone()
        .oneshot(get_request("/api/v1/flags/dark-mode"))
        .await
        .unwrap();
    assert_eq!(parse_response_body(response).await["enabled"], false);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/flags/dark-mode/status",
            json!({"enabled": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request("/api/v1/flags/dark-mode"))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["enabled"], true);
    // Status-only update leaves the other fields alone.
    assert_eq!(body["description"], "UI theme");
    assert_eq!(body["name"], "dark-mode");
}

#[tokio::test]
async fn test_status_toggle_unknown_flag_is_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/flags/ghost/status",
            json!({"enabled": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Feature Flag not found!");
}

#[tokio::test]
async fn test_rename_invalidates_old_name() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "old-name"}),
        ))
        .await
        .unwrap();
    let id = parse_response_body(response).await["id"].clone();

    app.clone()
        .oneshot(get_request("/api/v1/flags/old-name"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/flags/{id}"),
            json!({"name": "new-name"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/flags/old-name"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get_request("/api/v1/flags/new-name"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rename_to_name_held_by_another_flag_conflicts() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "first"}),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "second"}),
        ))
        .await
        .unwrap();
    let id = parse_response_body(response).await["id"].clone();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/flags/{id}"),
            json!({"name": "first"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_removes_flag() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/flags",
            json!({"name": "dark-mode"}),
        ))
        .await
        .unwrap();
    let id = parse_response_body(response).await["id"].clone();

    app.clone()
        .oneshot(get_request("/api/v1/flags/dark-mode"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/v1/flags/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request("/api/v1/flags/dark-mode"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_every_flag() {
    let app = create_test_app();

    for name in ["a", "b"] {
        app.clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/flags",
                json!({"name": name}),
            ))
            .await
            .unwrap();
    }

    let response = app.oneshot(get_request("/api/v1/flags")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}
