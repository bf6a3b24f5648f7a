//! Configuration management for the API client
//!
//! This module resolves the client configuration (base URL, connect timeout,
//! read timeout) from layered sources, with support for environment variables
//! and caller-supplied property layers.
//!
//! Resolution order per field, first non-blank value wins:
//!
//! 1. explicit override supplied by the caller
//! 2. property layer (a [`ConfigProvider`], typically in-memory)
//! 3. environment variable
//! 4. hard-coded default
//!
//! Blank or whitespace-only values are treated as absent at every layer.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

use crate::error::{ApiError, Result};

/// Property key for the base URL
pub const PROP_BASE_URL: &str = "api.baseUrl";
/// Property key for the connect timeout in milliseconds
pub const PROP_CONNECT_TIMEOUT_MS: &str = "api.connectTimeoutMs";
/// Property key for the read timeout in milliseconds
pub const PROP_READ_TIMEOUT_MS: &str = "api.readTimeoutMs";

/// Environment key for the base URL
pub const ENV_BASE_URL: &str = "API_BASE_URL";
/// Environment key for the connect timeout in milliseconds
pub const ENV_CONNECT_TIMEOUT_MS: &str = "API_CONNECT_TIMEOUT_MS";
/// Environment key for the read timeout in milliseconds
pub const ENV_READ_TIMEOUT_MS: &str = "API_READ_TIMEOUT_MS";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_READ_TIMEOUT_MS: u64 = 15_000;

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value, if present
    fn get_string(&self, key: &str) -> Option<String>;
}

/// Configuration provider backed by process environment variables
///
/// Keys are passed through verbatim (e.g. `API_BASE_URL`).
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider;

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// In-memory config provider for testing or static configuration
///
/// This is also how a JVM-style "system property" layer is modeled: the test
/// harness populates it once and passes it as the property layer.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Global default environment provider
pub static DEFAULT_ENV_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new()));

/// Explicit per-field overrides, the highest-precedence resolution layer
///
/// Values are kept as strings so the blank-is-absent rule and the numeric
/// parse path are identical across all layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    base_url: Option<String>,
    connect_timeout_ms: Option<String>,
    read_timeout_ms: Option<String>,
}

impl ConfigOverrides {
    /// Create an empty override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the connect timeout in milliseconds
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = Some(ms.to_string());
        self
    }

    /// Override the read timeout in milliseconds
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.read_timeout_ms = Some(ms.to_string());
        self
    }
}

/// Centralized configuration for API tests
///
/// Immutable once constructed; held by the client for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL for all API calls
    pub base_url: String,

    /// Connection timeout used by the HTTP client
    pub connect_timeout: Duration,

    /// Read / socket timeout used by the HTTP client
    pub read_timeout: Duration,
}

impl ApiConfig {
    /// Explicit factory, useful for tests and embedded servers
    ///
    /// Bypasses layered resolution entirely; validation happens when the
    /// client is constructed.
    pub fn of(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout,
            read_timeout,
        }
    }

    /// Resolve configuration from the process environment with defaults
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            &ConfigOverrides::new(),
            &MemoryConfigProvider::new(),
            &**DEFAULT_ENV_PROVIDER,
        )
    }

    /// Resolve configuration from layered sources
    ///
    /// Per field, the first non-blank value wins: override, then the property
    /// layer, then the environment layer, then the default. Fails with a
    /// configuration error if a winning timeout value is not a number.
    pub fn resolve(
        overrides: &ConfigOverrides,
        props: &dyn ConfigProvider,
        env: &dyn ConfigProvider,
    ) -> Result<Self> {
        let base_url = first_non_blank([
            overrides.base_url.clone(),
            props.get_string(PROP_BASE_URL),
            env.get_string(ENV_BASE_URL),
        ])
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let connect_timeout = parse_millis(
            PROP_CONNECT_TIMEOUT_MS,
            first_non_blank([
                overrides.connect_timeout_ms.clone(),
                props.get_string(PROP_CONNECT_TIMEOUT_MS),
                env.get_string(ENV_CONNECT_TIMEOUT_MS),
            ]),
            DEFAULT_CONNECT_TIMEOUT_MS,
        )?;

        let read_timeout = parse_millis(
            PROP_READ_TIMEOUT_MS,
            first_non_blank([
                overrides.read_timeout_ms.clone(),
                props.get_string(PROP_READ_TIMEOUT_MS),
                env.get_string(ENV_READ_TIMEOUT_MS),
            ]),
            DEFAULT_READ_TIMEOUT_MS,
        )?;

        Ok(Self {
            base_url,
            connect_timeout,
            read_timeout,
        })
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ApiError::configuration("Base URL is required"));
        }

        Url::parse(&self.base_url)
            .map_err(|e| ApiError::configuration(format!("Invalid base URL: {}", e)))?;

        if self.connect_timeout.is_zero() {
            return Err(ApiError::configuration("Connect timeout must be positive"));
        }

        if self.read_timeout.is_zero() {
            return Err(ApiError::configuration("Read timeout must be positive"));
        }

        Ok(())
    }
}

/// Return the first non-blank value, trimmed
fn first_non_blank<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn parse_millis(key: &str, value: Option<String>, default: u64) -> Result<Duration> {
    let millis = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            ApiError::configuration(format!("Invalid numeric value for {}: {}", key, v))
        })?,
        None => default,
    };

    Ok(Duration::from_millis(millis))
}
