//! Unified error types for the employment API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business rule and persistence errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//! - `ConfigError`: Startup configuration errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Field name used for record-level failures that are not tied to one input field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Domain layer errors - business rule violations and store failures
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{field}: {message}")]
    Required {
        field: &'static str,
        message: String,
    },

    #[error("{field}: {message}")]
    InvalidFormat {
        field: &'static str,
        message: String,
    },

    #[error("{field}: {message}")]
    InvalidReference {
        field: &'static str,
        message: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl DomainError {
    pub fn required(field: &'static str) -> Self {
        DomainError::Required {
            field,
            message: "This field is required.".to_string(),
        }
    }

    pub fn invalid_format(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::InvalidFormat {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_reference(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::InvalidReference {
            field,
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, used in error bodies and tests
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Required { .. } => "required",
            DomainError::InvalidFormat { .. } => "invalid_format",
            DomainError::InvalidReference { .. } => "invalid_reference",
            DomainError::Conflict(_) => "conflict",
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidOperation(_) => "invalid_operation",
            DomainError::Database(_) => "database",
        }
    }
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::Domain(e) => e.code(),
            AppError::BadRequest(_) => "bad_request",
            AppError::NotFound(_) => "not_found",
            AppError::Internal(_) => "internal",
        };

        let (status, error, field, details) = match &self {
            AppError::Domain(DomainError::Required { field, message }) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(*field),
                Some(message.clone()),
            ),
            AppError::Domain(DomainError::InvalidFormat { field, message }) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(*field),
                Some(message.clone()),
            ),
            AppError::Domain(DomainError::InvalidReference { field, message }) => (
                StatusCode::BAD_REQUEST,
                "Invalid reference",
                Some(*field),
                Some(message.clone()),
            ),
            AppError::Domain(DomainError::Conflict(msg)) => (
                StatusCode::BAD_REQUEST,
                "Conflict",
                Some(NON_FIELD_ERRORS),
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::InvalidOperation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Invalid operation",
                Some(NON_FIELD_ERRORS),
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                "Not found",
                None,
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                    None,
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad request",
                None,
                Some(msg.clone()),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "Not found",
                None,
                Some(msg.clone()),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            code,
            field,
            details,
        });

        (status, body).into_response()
    }
}

/// Configuration errors raised while reading the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid value: {value}")]
    Invalid { name: &'static str, value: String },
}
