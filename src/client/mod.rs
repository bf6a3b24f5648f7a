//! Opinionated API client wrapper over reqwest
//!
//! Provides:
//!
//! - centralized base URL and timeouts from [`ApiConfig`](crate::config::ApiConfig)
//! - JSON defaults for outgoing and accepted content types
//! - automatic request/response report attachments on every call
//!
//! The client builds [`RequestSpec`] values: pure builders with no side
//! effects until a verb is executed. Execution runs through the interception
//! pipeline in [`crate::filter`].

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::filter;
use crate::report::{Reporter, ReportSink};

const USER_AGENT: &str = concat!("apitest-sdk/", env!("CARGO_PKG_VERSION"));

/// API client holding one configured HTTP client and one report sink
pub struct ApiClient {
    http_client: Client,
    config: ApiConfig,
    reporter: Reporter,
}

impl ApiClient {
    /// Create a client from an explicit configuration and report sink
    ///
    /// Validates the configuration and builds the underlying HTTP client
    /// once; both are held for the client's lifetime.
    pub fn new(config: ApiConfig, sink: Arc<dyn ReportSink>) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ApiError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
            reporter: Reporter::new(sink),
        })
    }

    /// Create a client using configuration resolved from the environment
    pub fn from_env(sink: Arc<dyn ReportSink>) -> Result<Self> {
        Self::new(ApiConfig::from_env()?, sink)
    }

    /// The client's configuration
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The reporter bound to this client's sink
    ///
    /// Test code uses this to attach ad-hoc artifacts next to the automatic
    /// request/response dumps.
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Create a request specification ready for execution
    ///
    /// Applies the base URL and JSON content-type/accept defaults. No side
    /// effects until a verb is invoked.
    pub fn request(&self) -> RequestSpec<'_> {
        RequestSpec::new(self)
    }

    fn join_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');

        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A single request under construction
///
/// Pure builder: collects headers, query parameters and an optional body,
/// then executes through the interception pipeline when a verb is called.
pub struct RequestSpec<'a> {
    client: &'a ApiClient,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<String>,
    body_error: Option<ApiError>,
}

impl<'a> RequestSpec<'a> {
    fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            headers: vec![
                (CONTENT_TYPE.as_str().to_string(), "application/json".to_string()),
                (ACCEPT.as_str().to_string(), "application/json".to_string()),
            ],
            query: Vec::new(),
            body: None,
            body_error: None,
        }
    }

    /// Set a request header; later values for the same name win
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a raw text body
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body from a serializable value
    ///
    /// Serialization failures surface when the request is executed, keeping
    /// the builder chain side-effect free.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(serialized) => self.body = Some(serialized),
            Err(e) => self.body_error = Some(e.into()),
        }
        self
    }

    /// Execute a GET request against the given path
    pub async fn get(self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path).await
    }

    /// Execute a POST request against the given path
    pub async fn post(self, path: &str) -> Result<ApiResponse> {
        self.send(Method::POST, path).await
    }

    /// Execute a PUT request against the given path
    pub async fn put(self, path: &str) -> Result<ApiResponse> {
        self.send(Method::PUT, path).await
    }

    /// Execute a DELETE request against the given path
    pub async fn delete(self, path: &str) -> Result<ApiResponse> {
        self.send(Method::DELETE, path).await
    }

    /// Execute the request with an explicit method
    pub async fn send(self, method: Method, path: &str) -> Result<ApiResponse> {
        if let Some(e) = self.body_error {
            return Err(e);
        }

        let url = self.client.join_url(path);
        let mut builder = self.client.http_client.request(method, url);

        builder = builder.headers(build_header_map(&self.headers)?);

        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }

        if let Some(body) = self.body {
            builder = builder.body(body);
        }

        let request = builder.build()?;

        filter::intercept(&self.client.reporter, &self.client.http_client, request).await
    }
}

/// A fully read response
///
/// The payload is read eagerly so the interception pipeline can dump it; the
/// caller gets the same bytes back.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A single response header value as text, if present and readable
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw response body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response body decoded as UTF-8 text, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::configuration(format!("Invalid header name '{}': {}", name, e)))?;

        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::configuration(format!("Invalid header value for '{}': {}", name, e)))?;

        map.insert(header_name, header_value);
    }

    Ok(map)
}
