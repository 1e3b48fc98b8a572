//! App setting endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use domain::models::{AppSettingView, CreateAppSettingRequest, UpdateAppSettingRequest};

use crate::app::AppState;
use crate::error::ApiError;

/// List all app settings.
///
/// GET /api/v1/settings
pub async fn list_app_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppSettingView>>, ApiError> {
    Ok(Json(state.app_settings.get_all().await?))
}

/// Get an app setting by business key.
///
/// GET /api/v1/settings/{key}
pub async fn get_app_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AppSettingView>, ApiError> {
    Ok(Json(state.app_settings.get_by_key(&key).await?))
}

/// Create a new app setting.
///
/// POST /api/v1/settings
pub async fn create_app_setting(
    State(state): State<AppState>,
    Json(request): Json<CreateAppSettingRequest>,
) -> Result<(StatusCode, Json<AppSettingView>), ApiError> {
    let view = state.app_settings.create(request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Update an app setting by surrogate id.
///
/// PUT /api/v1/settings/{id}
pub async fn update_app_setting(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAppSettingRequest>,
) -> Result<StatusCode, ApiError> {
    state.app_settings.update(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an app setting by surrogate id.
///
/// DELETE /api/v1/settings/{id}
pub async fn delete_app_setting(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.app_settings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
