//! Error types for Hetzner Cloud operations.
//!
//! Three kinds of failure reach the caller: transport failures (connection,
//! timeout) mapped straight from the HTTP client, API errors decoded from the
//! `error` object of a failed response, and local failures (configuration,
//! validation, malformed success payloads).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error code used when a failed response carried no decodable `error` object.
pub const INVALID_ERROR_BODY: &str = "invalid_error_body";

/// Main error type for Hetzner Cloud operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The API rejected the request
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Operation timed out in the transport
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The API host could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// A success payload could not be decoded
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for Hetzner Cloud operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error as reported by the API.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{code}: {message} (HTTP {status})")]
pub struct ApiError {
    /// HTTP status code of the failed response
    pub status: u16,
    /// Machine-readable error code (e.g. `not_found`, `invalid_input`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error-specific details, if the API sent any
    pub details: Option<Value>,
}

/// Wire shape of a failed response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Wire shape of the `error` object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Validation failure for a single request field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending field
    pub name: String,
    /// Validation messages for the field
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ApiError {
    /// Builds an API error from a decoded `error` object.
    #[must_use]
    pub fn from_detail(status: u16, detail: ErrorDetail) -> Self {
        Self {
            status,
            code: detail.code,
            message: detail.message,
            details: detail.details,
        }
    }

    /// Builds the generic error reported when the failure body could not be decoded.
    #[must_use]
    pub fn undecodable(status: u16) -> Self {
        Self {
            status,
            code: INVALID_ERROR_BODY.to_string(),
            message: format!("request failed with HTTP {status} and an undecodable error body"),
            details: None,
        }
    }

    /// Returns true when the API reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code == "not_found" || self.status == 404
    }

    /// Per-field validation messages from `details.fields`, if present.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.details
            .as_ref()
            .and_then(|details| details.get("fields"))
            .and_then(|fields| serde_json::from_value(fields.clone()).ok())
            .unwrap_or_default()
    }
}

impl Error {
    /// Returns the error code for this error.
    ///
    /// API errors report the code sent by the server; local errors use a fixed code.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Api(err) => &err.code,
            Self::Timeout(_) => "timeout",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::HttpError(_) => "http_error",
            Self::ParseError(_) => "parse_error",
            Self::ConfigError(_) => "config_error",
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::ValidationError(_) => "validation_error",
        }
    }

    /// Returns true if the API reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_not_found())
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub fn should_log(&self) -> bool {
        match self {
            Self::Api(err) => err.status >= 500,
            Self::ParseError(_) | Self::ConfigError(_) => true,
            _ => false,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
