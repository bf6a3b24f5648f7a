//! Error handling for the API test SDK
//!
//! This module provides the error system for the SDK:
//! - Categorizes errors by type (configuration, network, timeout, parsing, step)
//! - Maps transport errors to normalized variants
//! - Provides a convenient Result type alias
//!
//! Reporting failures have no variant here on purpose: diagnostic artifacts
//! are forwarded best-effort and must never surface as caller-visible errors.

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Main error type for the API test SDK
#[derive(Error, Debug)]
pub enum ApiError {
    /// Configuration errors (invalid or unparseable inputs)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or connection errors
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Response parsing errors
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// A step action failed; the original failure is preserved as the cause
    #[error("Step '{name}' failed: {source}")]
    Step {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        ApiError::Timeout(message.into())
    }

    /// Create a parsing error
    pub fn parsing(message: impl Into<String>) -> Self {
        ApiError::Parsing(message.into())
    }

    /// Create a step error wrapping the action's failure as a typed cause
    pub fn step(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ApiError::Step {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Check whether this error came from the configuration layer
    pub fn is_configuration(&self) -> bool {
        matches!(self, ApiError::Configuration(_))
    }

    /// The cause of a step failure, if this is a step error
    pub fn step_cause(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            ApiError::Step { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convert reqwest errors to ApiError
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::timeout(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ApiError::network(format!("Connection error: {}", err))
        } else if err.is_decode() {
            ApiError::parsing(format!("Response decode error: {}", err))
        } else if err.is_builder() || err.is_request() {
            ApiError::configuration(format!("Invalid request: {}", err))
        } else {
            ApiError::network(format!("HTTP client error: {}", err))
        }
    }
}

/// Convert serde_json errors to ApiError
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::parsing(format!("JSON error: {}", err))
    }
}
