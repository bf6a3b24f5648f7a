//! # API Test SDK
//!
//! A test-automation support layer wrapping an HTTP client so that every
//! request/response pair, plus ad-hoc diagnostic artifacts, is forwarded to a
//! test-report sink.
//!
//! This crate provides:
//!
//! - A configured API client with base URL, timeouts and JSON defaults
//! - Automatic request/response dump attachments around every call
//! - Layered configuration resolution (overrides, properties, environment)
//! - Reporting primitives: text/JSON/byte attachments, links and named steps
//!
//! ## Architecture
//!
//! The SDK is designed around the following key abstractions:
//!
//! - `ApiClient` / `RequestSpec`: builds and executes requests
//! - `filter::intercept`: the before/after capture around each execution
//! - `Reporter`: facade over the report sink, fire-and-forget by contract
//! - `ReportSink`: the seam to the external report backend
//! - `ApiConfig`: immutable configuration resolved from layered sources
//!
//! Reporting is strictly best-effort: a broken sink never fails a test, and a
//! transport failure is never masked by a reporting failure.

// Re-export configuration management
pub mod config;
pub use config::{ApiConfig, ConfigOverrides, ConfigProvider, EnvConfigProvider, MemoryConfigProvider};

// Re-export the client
pub mod client;
pub use client::{ApiClient, ApiResponse, RequestSpec};

// Re-export the interception pipeline
pub mod filter;

// Re-export reporting primitives
pub mod report;
pub use report::{Attachment, Link, LinkKind, LogSink, RecordingSink, Reporter, ReportSink, StepStatus};

// Re-export error handling
pub mod error;
pub use error::{ApiError, Result};

#[cfg(test)]
mod tests;

use std::sync::Arc;

/// Create a client from an explicit configuration and report sink
pub fn client(config: ApiConfig, sink: Arc<dyn ReportSink>) -> Result<ApiClient> {
    ApiClient::new(config, sink)
}

/// Create a client using configuration resolved from the environment
pub fn client_from_env(sink: Arc<dyn ReportSink>) -> Result<ApiClient> {
    ApiClient::from_env(sink)
}
