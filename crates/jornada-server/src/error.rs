//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jornada_core::date_key::DateKeyError;
use jornada_core::day_store::DayStoreError;
use jornada_core::time_validation::TimeFormatError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unparseable date.
    #[error(transparent)]
    InvalidDate(#[from] DateKeyError),

    /// Unparseable time of day.
    #[error(transparent)]
    InvalidTime(#[from] TimeFormatError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Store error (persistence failed).
    #[error("storage error: {0}")]
    Store(#[from] DayStoreError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
            ApiError::InvalidTime(_) => (StatusCode::BAD_REQUEST, "invalid_time"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        if status.is_server_error() {
            error!("{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
