//! API error handling.
//!
//! The taxonomy distinguishes caller faults (NotFound, Validation), which
//! surface with their message, from system faults (code generation
//! exhaustion, storage failures, anything uncaught), which are logged with
//! full detail server-side and surfaced as a generic non-leaking message.

use crate::storage::StorageError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors produced by the service layer and mapped to HTTP responses.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Entity id or reference code absent
    #[error("{0}")]
    NotFound(String),
    /// Malformed or semantically invalid input
    #[error("{0}")]
    Validation(String),
    /// Reference code uniqueness retry budget exceeded
    #[error("Failed to generate a unique reference code")]
    CodeGenerationExhausted,
    /// Transactional or storage-layer failure
    #[error("Storage failure: {0}")]
    Storage(StorageError),
    /// Anything uncaught
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::CodeGenerationExhausted { .. } => Self::CodeGenerationExhausted,
            other => Self::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::CodeGenerationExhausted | Self::Storage(_) | Self::Unexpected(_) => {
                error!("internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your request".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
