//! Error types and handling
//!
//! All errors are converted to a consistent JSON response format. The
//! `message` field carries the text shown to the user as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized - authentication required (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden - insufficient permissions or quota (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflict - resource already exists or state conflict (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity - validation failed (422)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Transcription service failure (502)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Service unavailable (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        AppError::ServiceUnavailable(msg.into())
    }

    /// Message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound(m)
            | AppError::BadRequest(m)
            | AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::Conflict(m)
            | AppError::ValidationError(m)
            | AppError::Internal(m)
            | AppError::Upstream(m)
            | AppError::Database(m)
            | AppError::ServiceUnavailable(m) => m,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::ValidationError(_) => "validation_error",
            AppError::Internal(_) => "internal_error",
            AppError::Upstream(_) => "upstream_error",
            AppError::Database(_) => "database_error",
            AppError::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        // Internal failures are logged; their detail is not sent to the client
        let message = match &self {
            AppError::Internal(_) | AppError::Database(_) => {
                error!(error = %self, error_type = error_type, "Request error");
                "An internal error occurred".to_string()
            }
            AppError::Upstream(_) | AppError::ServiceUnavailable(_) => {
                error!(error = %self, error_type = error_type, "Request error");
                self.message().to_string()
            }
            _ => self.message().to_string(),
        };

        (status, Json(ErrorResponse::new(error_type, message))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.message().contains("UNIQUE constraint failed") {
                    AppError::Conflict("Resource already exists".to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
