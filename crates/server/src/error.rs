//! Unified error handling for the server.
//!
//! Every JSON handler returns `Result<T, AppError>`; the `IntoResponse` impl
//! maps the error taxonomy onto HTTP statuses and the
//! `{"success": false, "error": {"code", "message"}}` envelope, capturing
//! server-side failures to Sentry before responding.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database/provider operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Required field missing or malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Name collision with an existing row.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Delete blocked because dependent rows exist.
    #[error("Related data exists: {0}")]
    RelatedData(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Public store lookup miss (absent or inactive row).
    #[error("Store not found")]
    StoreNotFound,

    /// Missing or invalid admin session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl AppError {
    /// Envelope code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => "NOT_FOUND",
            Self::Database(RepositoryError::Conflict(_)) | Self::Duplicate(_) => "DUPLICATE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RelatedData(_) => "RELATED_DATA_EXISTS",
            Self::StoreNotFound => "STORE_NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) | Self::StoreNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Database(RepositoryError::Conflict(_))
            | Self::Duplicate(_)
            | Self::Validation(_)
            | Self::RelatedData(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry; clients only see a generic message.
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(_)) => {
                "This name is already registered".to_string()
            }
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::StoreNotFound => "Store not found".to_string(),
            Self::Validation(msg)
            | Self::Duplicate(msg)
            | Self::RelatedData(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg) => msg.clone(),
        };

        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.code(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
