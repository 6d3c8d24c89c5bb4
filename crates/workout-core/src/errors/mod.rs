// ABOUTME: Unified error type and error codes shared by the pipeline, server, and CLI
// ABOUTME: Maps error codes to HTTP statuses and renders JSON error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Defines the standard error codes, the `AppError` type carried through every
//! fallible operation, and the JSON error body returned by the HTTP adapter.
//! Pipeline-specific failures are modeled by [`FormatError`] and converted into
//! `AppError` at the pipeline boundary.

mod format;

pub use format::FormatError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation
    /// The caller supplied invalid input
    InvalidInput,
    /// A required field is missing from the request
    MissingRequiredField,
    /// A value is outside the accepted range
    ValueOutOfRange,
    /// The data format is invalid
    InvalidFormat,

    // Resources
    /// A referenced resource (e.g. a library file) does not exist
    ResourceNotFound,

    // External services
    /// The language model returned output that is not a valid workout
    InvalidModelOutput,
    /// The completion provider returned an error
    ExternalServiceError,
    /// The completion provider could not be reached
    ExternalServiceUnavailable,
    /// The completion provider rejected our credential
    ExternalAuthFailed,
    /// The completion provider is rate limiting us
    ExternalRateLimited,

    // Configuration
    /// Generic configuration error
    ConfigError,
    /// Required configuration is missing
    ConfigMissing,
    /// Configuration value could not be parsed
    ConfigInvalid,

    // Internal
    /// JSON serialization failure
    SerializationError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::ValueOutOfRange
            | Self::InvalidFormat => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 502 Bad Gateway: the upstream answered, but not usefully
            Self::InvalidModelOutput | Self::ExternalServiceError | Self::ExternalAuthFailed => {
                502
            }

            // 503 Service Unavailable
            Self::ExternalServiceUnavailable | Self::ExternalRateLimited => 503,

            // 500 Internal Server Error
            Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::SerializationError
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidFormat => "The data format is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::InvalidModelOutput => "The language model returned an unusable workout",
            Self::ExternalServiceError => "The completion provider encountered an error",
            Self::ExternalServiceUnavailable => "The completion provider is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with the completion provider failed",
            Self::ExternalRateLimited => "The completion provider rate limit was exceeded",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether a caller-side retry could plausibly succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExternalServiceError | Self::ExternalServiceUnavailable | Self::ExternalRateLimited
        )
    }
}

/// Unified error type for the application
///
/// The `Display` output is the bare message so it can be shown to users as-is.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Request ID for tracing, when the error crossed the HTTP boundary
    pub request_id: Option<String>,
    /// Optional structured details
    pub details: Option<Value>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            details: None,
        }
    }

    /// Attach a request ID
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Missing configuration value
    #[must_use]
    pub fn config_missing(variable: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{variable} not configured"),
        )
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service unreachable or overloaded
    #[must_use]
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::SerializationError,
            format!("JSON serialization failed: {error}"),
        )
    }
}

/// HTTP error response format
///
/// `error` carries the human-readable message so clients can display it directly.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Request ID, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Structured details, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: error.message,
            code: error.code,
            request_id: error.request_id,
            details: error.details,
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(code = ?self.code, "{}", self.message);
            } else {
                tracing::debug!(code = ?self.code, "{}", self.message);
            }
            (status, Json(ErrorResponse::from(self))).into_response()
        }
    }
}
