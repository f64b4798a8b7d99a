//! API error boundary
//!
//! Every storage failure is caught here and converted into the structured
//! `{"success": false, "message": ...}` JSON body; nothing propagates to the
//! client as an unhandled fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/empty required field or unparseable body. Client's fault.
    #[error("{0}")]
    Validation(String),

    /// Unique-constraint violation on email.
    #[error("Email already exists")]
    Conflict,

    /// Store unreachable or statement failure.
    #[error("{0}")]
    Storage(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateEmail => ApiError::Conflict,
            StorageError::Database(e) => ApiError::Storage(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
