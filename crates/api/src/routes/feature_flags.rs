//! Feature flag endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use domain::models::{
    CreateFeatureFlagRequest, FeatureFlagView, UpdateFeatureFlagRequest, UpdateFlagStatusRequest,
};

use crate::app::AppState;
use crate::error::ApiError;

/// List all feature flags.
///
/// GET /api/v1/flags
pub async fn list_feature_flags(
    State(state): State<AppState>,
) -> Result<Json<Vec<FeatureFlagView>>, ApiError> {
    Ok(Json(state.feature_flags.get_all().await?))
}

/// Get a feature flag by name.
///
/// GET /api/v1/flags/{name}
pub async fn get_feature_flag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<FeatureFlagView>, ApiError> {
    Ok(Json(state.feature_flags.get_by_name(&name).await?))
}

/// Create a new feature flag. New flags always start disabled.
///
/// POST /api/v1/flags
pub async fn create_feature_flag(
    State(state): State<AppState>,
    Json(request): Json<CreateFeatureFlagRequest>,
) -> Result<(StatusCode, Json<FeatureFlagView>), ApiError> {
    let view = state.feature_flags.create(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Update a feature flag's name and description by surrogate id.
///
/// PUT /api/v1/flags/{id}
pub async fn update_feature_flag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateFeatureFlagRequest>,
) -> Result<StatusCode, ApiError> {
    state.feature_flags.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle a feature flag's enabled state by name.
///
/// PATCH /api/v1/flags/{name}/status
pub async fn update_feature_flag_status(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<UpdateFlagStatusRequest>,
) -> Result<StatusCode, ApiError> {
    state.feature_flags.update_status(&name, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a feature flag by surrogate id.
///
/// DELETE /api/v1/flags/{id}
pub async fn delete_feature_flag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.feature_flags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
