use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::cache::ReadCache;
use domain::services::{AppSettingService, FeatureFlagService};
use persistence::stores::{PgAppSettingStore, PgFeatureFlagStore};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{app_settings, feature_flags, health};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: Option<PgPool>,
    pub app_settings: AppSettingService,
    pub feature_flags: FeatureFlagService,
}

/// Builds the application wired to Postgres-backed stores.
///
/// The read caches are constructed once here and shared by reference with
/// every service handle cloned out of the router state.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let policy = config.cache.policy();
    let app_settings = AppSettingService::new(
        Arc::new(PgAppSettingStore::new(pool.clone())),
        ReadCache::with_policy(policy),
    );
    let feature_flags = FeatureFlagService::new(
        Arc::new(PgFeatureFlagStore::new(pool.clone())),
        ReadCache::with_policy(policy),
    );
    router(config, Some(pool), app_settings, feature_flags)
}

/// Builds the router around already-wired services.
///
/// Tests use this entry point with in-memory stores.
pub fn router(
    config: Config,
    pool: Option<PgPool>,
    app_settings: AppSettingService,
    feature_flags: FeatureFlagService,
) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        config: config.clone(),
        pool,
        app_settings,
        feature_flags,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Versioned API routes
    let api_routes = Router::new()
        .route(
            "/api/v1/settings",
            get(app_settings::list_app_settings).post(app_settings::create_app_setting),
        )
        .route(
            "/api/v1/settings/:key",
            get(app_settings::get_app_setting)
                .put(app_settings::update_app_setting)
                .delete(app_settings::delete_app_setting),
        )
        .route(
            "/api/v1/flags",
            get(feature_flags::list_feature_flags).post(feature_flags::create_feature_flag),
        )
        .route(
            "/api/v1/flags/:name",
            get(feature_flags::get_feature_flag)
                .put(feature_flags::update_feature_flag)
                .delete(feature_flags::delete_feature_flag),
        )
        .route(
            "/api/v1/flags/:name/status",
            patch(feature_flags::update_feature_flag_status),
        );

    // Public routes (health probes and metrics)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Global middleware (order matters: bottom layers run first)
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
