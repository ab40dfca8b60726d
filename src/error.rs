/// Unified error types for maintdesk
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No session on a gated request. Rendered as a redirect to the login
    /// page, matching what an anonymous browser request would get.
    #[error("Login required")]
    LoginRequired,

    /// Authentication errors (bad credentials, expired session)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authorization errors (authenticated but wrong role)
    #[error("Access denied: {0}")]
    Authorization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation errors carrying per-field messages
    #[error("Validation error: {message}")]
    ValidationFields {
        message: String,
        field_errors: HashMap<String, String>,
    },

    /// Not found. Also covers mutations whose conditional update matched
    /// zero rows: a ticket outside the caller's scope is reported exactly
    /// like a ticket that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors (e.g. registration already completed)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, String>>,
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Anonymous requests to gated routes get the login redirect, not an
        // error payload.
        if matches!(self, AppError::LoginRequired) {
            return Redirect::to("/login").into_response();
        }

        let (status, error_code, message, field_errors) = match self {
            AppError::Authentication(_) => (
                StatusCode::UNAUTHORIZED,
                "AuthenticationFailed",
                self.to_string(),
                None,
            ),
            AppError::Authorization(_) => (
                StatusCode::FORBIDDEN,
                "AccessDenied",
                self.to_string(),
                None,
            ),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                self.to_string(),
                None,
            ),
            AppError::ValidationFields {
                ref message,
                ref field_errors,
            } => (
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                message.clone(),
                Some(field_errors.clone()),
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "NotFound",
                self.to_string(),
                None,
            ),
            AppError::Conflict(_) => (
                StatusCode::CONFLICT,
                "Conflict",
                self.to_string(),
                None,
            ),
            AppError::Database(_) | AppError::Internal(_) | AppError::Io(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "Internal server error".to_string(), // Don't leak details
                    None,
                )
            }
            AppError::LoginRequired => unreachable!(),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            field_errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type AppResult<T> = Result<T, AppError>;
