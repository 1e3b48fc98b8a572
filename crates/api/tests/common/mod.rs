//! Shared helpers for integration tests.
//!
//! The app under test is wired to in-memory stores, so each test gets an
//! isolated durable state and a cold cache.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use config_service_api::app::router;
use config_service_api::config::Config;
use domain::cache::ReadCache;
use domain::services::{AppSettingService, FeatureFlagService};
use domain::store::MemoryStore;

pub fn test_config() -> Config {
    let defaults = r#"
        [server]
        host = "127.0.0.1"
        port = 8080
        request_timeout_secs = 30

        [database]
        url = ""

        [logging]
        level = "info"
        format = "json"

        [cache]
        absolute_ttl_secs = 3600
        sliding_ttl_secs = 900

        [security]
        cors_origins = []
    "#;

    config::Config::builder()
        .add_source(config::File::from_str(defaults, config::FileFormat::Toml))
        .build()
        .expect("failed to build test config")
        .try_deserialize()
        .expect("failed to deserialize test config")
}

/// Builds the app over fresh in-memory stores.
///
/// Clone the returned router between requests; clones share the stores
/// and caches, mirroring one running process.
pub fn create_test_app() -> Router {
    let app_settings = AppSettingService::new(Arc::new(MemoryStore::new()), ReadCache::new());
    let feature_flags = FeatureFlagService::new(Arc::new(MemoryStore::new()), ReadCache::new());
    router(test_config(), None, app_settings, feature_flags)
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not valid JSON")
}
