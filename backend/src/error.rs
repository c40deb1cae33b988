//! Error handling for the Salon Supply CRM replenishment engine

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Caller contract violations
    #[error("Invalid forecast input: {field}: {message}")]
    InvalidForecastInput { field: String, message: String },

    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    // External platform errors
    #[error("Platform authentication failed with status {status}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("Platform returned status {status}")]
    UpstreamUnavailable { status: u16, body: String },

    /// A request was sent but its outcome was never learned. Never treated
    /// as either success or failure.
    #[error("Ambiguous outcome: {message}")]
    AmbiguousOutcome { message: String },

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// True when the platform rejected our bearer token, which signals a
    /// stale cached session rather than a real failure.
    pub fn is_stale_session(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamUnavailable { status: 401 | 403, .. }
        )
    }
}

impl From<shared::InputViolation> for AppError {
    fn from(violation: shared::InputViolation) -> Self {
        AppError::Validation {
            field: violation.field,
            message: violation.message,
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidForecastInput { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_FORECAST_INPUT".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::AuthenticationFailed { status, body } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "PLATFORM_AUTH_FAILED".to_string(),
                    message: format!(
                        "inventory platform rejected credentials ({}): {}",
                        status, body
                    ),
                    field: None,
                },
            ),
            AppError::UpstreamUnavailable { status, body } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "UPSTREAM_UNAVAILABLE".to_string(),
                    message: format!("inventory platform error ({}): {}", status, body),
                    field: None,
                },
            ),
            AppError::AmbiguousOutcome { message } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "AMBIGUOUS_OUTCOME".to_string(),
                    message: message.clone(),
                    field: None,
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
