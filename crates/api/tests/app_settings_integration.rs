//! Integration tests for app setting endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_app, delete_request, get_request, json_request, parse_response_body};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_and_get_app_setting() {
    let app = create_test_app();

    let request = json_request(
        Method::POST,
        "/api/v1/settings",
        json!({"key": "retention-days", "value": "30", "type": "number", "description": "days kept"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["key"], "retention-days");
    assert_eq!(body["value"], "30");
    assert_eq!(body["type"], "number");
    assert_eq!(body["description"], "days kept");
    assert!(body.get("createdAt").is_some());
    assert!(body.get("updatedAt").is_some());

    let response = app
        .oneshot(get_request("/api/v1/settings/retention-days"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["key"], "retention-days");
    assert_eq!(body["value"], "30");
}

#[tokio::test]
async fn test_create_duplicate_key_conflicts() {
    let app = create_test_app();
    let payload = json!({"key": "retention-days", "value": "30", "type": "number"});

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/settings", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(Method::POST, "/api/v1/settings", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "already_exists");
    assert_eq!(body["message"], "App Setting with this key already exists!");
}

#[tokio::test]
async fn test_create_with_empty_key_is_rejected() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/settings",
            json!({"key": "", "value": "30", "type": "number"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "invalid_field");
    assert_eq!(body["message"], "key field is invalid.");
}

#[tokio::test]
async fn test_missing_key_is_not_poisoned_by_earlier_misses() {
    let app = create_test_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(get_request("/api/v1/settings/ghost"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = parse_response_body(response).await;
        assert_eq!(body["message"], "App Setting not found!");
    }

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/settings",
            json!({"key": "ghost", "value": "1", "type": "string"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get_request("/api/v1/settings/ghost"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_reflects_on_next_read_for_old_and_new_key() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/settings",
            json!({"key": "old-key", "value": "30", "type": "number"}),
        ))
        .await
        .unwrap();
    let id = parse_response_body(response).await["id"].clone();

    // Populate the cache under the old key.
    let response = app
        .clone()
        .oneshot(get_request("/api/v1/settings/old-key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/v1/settings/{id}"),
            json!({"key": "new-key", "value": "45"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/settings/old-key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get_request("/api/v1/settings/new-key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["value"], "45");
    // Type was omitted in the update and must be preserved.
    assert_eq!(body["type"], "number");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/settings/404",
            json!({"key": "k", "value": "v"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_non_numeric_id_is_a_client_error() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/api/v1/settings/not-a-number",
            json!({"key": "k", "value": "v"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_durable_and_cached_state() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/settings",
            json!({"key": "retention-days", "value": "30", "type": "number"}),
        ))
        .await
        .unwrap();
    let id = parse_response_body(response).await["id"].clone();

    // Read once so the cache holds a copy.
    app.clone()
        .oneshot(get_request("/api/v1/settings/retention-days"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/v1/settings/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/settings/retention-days"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(delete_request(&format!("/api/v1/settings/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_every_setting() {
    let app = create_test_app();

    for key in ["a", "b", "c"] {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/settings",
                json!({"key": key, "value": "1", "type": "string"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get_request("/api/v1/settings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}
