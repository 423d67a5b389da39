//! Error responses.
//!
//! # Responsibilities
//! - Map domain errors to HTTP status codes
//! - Render every error as `{"error": "<message>"}`
//!
//! # Design Decisions
//! - Validation errors are 400 and never reach storage
//! - Unique index violations are 409 Conflict
//! - Storage timeouts result in 504 Gateway Timeout

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::storage::StorageError;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyPassword | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::Storage(StorageError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            AppError::Storage(StorageError::DuplicateKey(_)) => StatusCode::CONFLICT,
            AppError::Storage(StorageError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Hashing(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
