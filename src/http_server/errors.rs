//! # HTTP API Errors
//!
//! One error contract for callers: field-keyed errors for anything the caller
//! can fix, an opaque message for everything else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::FieldErrors;

/// Message returned for every unexpected failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned for an unparsable request body.
pub const MALFORMED_BODY_MESSAGE: &str = "Request body must be valid JSON";

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Submission or schema validation failed
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Natural keys already taken
    #[error("conflict: {0}")]
    Conflict(FieldErrors),

    /// Body is not JSON
    #[error("malformed body: {0}")]
    MalformedBody(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Anything the caller cannot fix; the detail is never sent
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => ApiError::Validation(errors),
            StoreError::DuplicateKey(fields) => ApiError::Conflict(FieldErrors::duplicates(&fields)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Body of 400 and 409 responses
#[derive(Debug, Serialize)]
pub struct FieldErrorResponse<E: Serialize> {
    pub ok: bool,
    pub errors: E,
}

/// Body of 500 responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) | ApiError::Conflict(errors) => {
                (status, Json(FieldErrorResponse { ok: false, errors })).into_response()
            }
            ApiError::MalformedBody(_) => (
                status,
                Json(FieldErrorResponse {
                    ok: false,
                    errors: json!({ "body": MALFORMED_BODY_MESSAGE }),
                }),
            )
                .into_response(),
            ApiError::Internal(_) => (
                status,
                Json(ErrorResponse {
                    ok: false,
                    error: INTERNAL_ERROR_MESSAGE.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
