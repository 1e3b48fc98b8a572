use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::errors::DomainError;

/// HTTP-facing error wrapper around the domain taxonomy.
///
/// Classified failures keep their fixed status code and formatted message.
/// Unclassified failures map to 500 and expose only the error's own
/// description, never internal state.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Domain(err) = self;

        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_code = match &err {
            DomainError::InvalidField(_) => "invalid_field",
            DomainError::NotFound(_) => "not_found",
            DomainError::AlreadyExists(_, _) => "already_exists",
            DomainError::Store(_) => "internal_error",
        };

        if status.is_server_error() {
            tracing::error!("Unclassified error: {}", err);
        }

        let body = ErrorBody {
            error: error_code.into(),
            message: err.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
