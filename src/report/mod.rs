//! Reporting primitives for diagnostic artifacts
//!
//! This module provides the reporting side of the SDK:
//!
//! - `ReportSink`: the seam to the external test-report backend
//! - `Reporter`: facade exposing attachment, link and step primitives
//! - `Attachment` / `Link`: artifact types with defaulting rules
//! - `LogSink`: out-of-the-box sink forwarding artifacts to the log facade
//! - `RecordingSink`: in-memory sink for asserting forwarded artifacts
//!
//! All artifacts are fire-and-forget by contract: a failing sink is logged
//! and dropped, never surfaced to the caller. Reporting must not turn a
//! passing test into a failing one.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use log::warn;

use crate::error::{ApiError, Result};

/// Default mime type for byte attachments
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Default file extension for byte attachments
const DEFAULT_EXTENSION: &str = ".bin";

/// Result type for sink implementations
///
/// External backends may fail for their own reasons; the `Reporter` absorbs
/// every such failure at the boundary.
pub type SinkResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A named diagnostic artifact forwarded to the report sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Display name in the report
    pub name: String,

    /// Mime type of the content
    pub mime_type: String,

    /// File extension including the leading dot
    pub extension: String,

    /// Raw content bytes
    pub content: Vec<u8>,
}

impl Attachment {
    /// Create an attachment with the defaulting rules applied
    ///
    /// Blank mime type defaults to `application/octet-stream`, blank
    /// extension to `.bin`, absent data to an empty byte sequence.
    pub fn new(name: &str, mime_type: &str, data: Option<&[u8]>, extension: &str) -> Self {
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            mime_type
        };

        let extension = if extension.trim().is_empty() {
            DEFAULT_EXTENSION
        } else {
            extension
        };

        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            extension: extension.to_string(),
            content: data.unwrap_or_default().to_vec(),
        }
    }

    /// Create a plain text attachment
    ///
    /// Absent content is rendered as the literal string `null`.
    pub fn text(name: &str, content: Option<&str>) -> Self {
        Self::new(
            name,
            "text/plain",
            Some(content.unwrap_or("null").as_bytes()),
            ".txt",
        )
    }

    /// Create a JSON attachment
    ///
    /// The content is forwarded verbatim and is NOT validated; the caller is
    /// responsible for providing a JSON-formatted string.
    pub fn json(name: &str, content: Option<&str>) -> Self {
        Self::new(
            name,
            "application/json",
            Some(content.unwrap_or("null").as_bytes()),
            ".json",
        )
    }

    /// Content decoded as UTF-8 text, lossily
    pub fn content_text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Kind of a report link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Generic link (spec, documentation, ...)
    Link,
    /// Defect tracker link
    Issue,
    /// Test management system link
    Tms,
}

impl LinkKind {
    /// Identifier used when the caller passes a blank one
    pub fn default_name(&self) -> &'static str {
        match self {
            LinkKind::Link => "link",
            LinkKind::Issue => "issue",
            LinkKind::Tms => "tms",
        }
    }
}

/// A link registered on the current test in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Link kind
    pub kind: LinkKind,

    /// Display identifier (issue id, test case id, or label)
    pub name: String,

    /// Target URL
    pub url: String,
}

impl Link {
    /// Create a link with the defaulting rules applied
    ///
    /// A blank name falls back to the kind's default identifier; an absent
    /// URL falls back to the empty string.
    pub fn new(kind: LinkKind, name: &str, url: Option<&str>) -> Self {
        let name = if name.trim().is_empty() {
            kind.default_name()
        } else {
            name
        };

        Self {
            kind,
            name: name.to_string(),
            url: url.unwrap_or("").to_string(),
        }
    }
}

/// Outcome of a traced step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed,
}

/// Seam to the external test-report backend
///
/// Implementations are expected to be thread-safe; the SDK may forward
/// artifacts from independent tasks sharing one client.
pub trait ReportSink: Send + Sync {
    /// Store an attachment
    fn add_attachment(&self, attachment: &Attachment) -> SinkResult;

    /// Register a link on the current test
    fn add_link(&self, link: &Link) -> SinkResult;

    /// Record that a named step started
    fn step_started(&self, name: &str) -> SinkResult;

    /// Record that a named step finished with the given outcome
    fn step_finished(&self, name: &str, status: StepStatus) -> SinkResult;
}

/// Stateless facade over a report sink
///
/// Holds no mutable state; every artifact is forwarded immediately. Cheap to
/// clone and share.
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<dyn ReportSink>,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

impl Reporter {
    /// Create a reporter forwarding to the given sink
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// Attach plain text content; absent content renders as `null`
    pub fn attach_text(&self, name: &str, content: Option<&str>) {
        self.forward_attachment(Attachment::text(name, content));
    }

    /// Attach JSON content, forwarded verbatim without validation
    pub fn attach_json(&self, name: &str, content: Option<&str>) {
        self.forward_attachment(Attachment::json(name, content));
    }

    /// Attach arbitrary bytes with explicit mime type and extension
    ///
    /// Blank mime type and extension fall back to
    /// `application/octet-stream` / `.bin`; absent data to an empty payload.
    pub fn attach_bytes(&self, name: &str, mime_type: &str, data: Option<&[u8]>, extension: &str) {
        self.forward_attachment(Attachment::new(name, mime_type, data, extension));
    }

    /// Register a generic link; blank name defaults to `link`
    pub fn link(&self, name: &str, url: Option<&str>) {
        self.forward_link(Link::new(LinkKind::Link, name, url));
    }

    /// Register an issue link; blank id defaults to `issue`
    pub fn issue(&self, id: &str, url: Option<&str>) {
        self.forward_link(Link::new(LinkKind::Issue, id, url));
    }

    /// Register a test-management link; blank id defaults to `tms`
    pub fn tms(&self, id: &str, url: Option<&str>) {
        self.forward_link(Link::new(LinkKind::Tms, id, url));
    }

    /// Execute a named step, tracing its outcome on the sink
    ///
    /// The action runs synchronously. On failure the original error is
    /// preserved as the typed cause of the returned step error.
    pub fn step<T, E, F>(&self, name: &str, action: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.trace_step_started(name);

        match action() {
            Ok(value) => {
                self.trace_step_finished(name, StepStatus::Passed);
                Ok(value)
            }
            Err(e) => {
                self.trace_step_finished(name, StepStatus::Failed);
                Err(ApiError::step(name, e))
            }
        }
    }

    /// Async variant of [`step`](Self::step) for actions that await
    pub async fn step_async<T, E, F, Fut>(&self, name: &str, action: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.trace_step_started(name);

        match action().await {
            Ok(value) => {
                self.trace_step_finished(name, StepStatus::Passed);
                Ok(value)
            }
            Err(e) => {
                self.trace_step_finished(name, StepStatus::Failed);
                Err(ApiError::step(name, e))
            }
        }
    }

    fn forward_attachment(&self, attachment: Attachment) {
        if let Err(e) = self.sink.add_attachment(&attachment) {
            warn!("Dropping attachment '{}': {}", attachment.name, e);
        }
    }

    fn forward_link(&self, link: Link) {
        if let Err(e) = self.sink.add_link(&link) {
            warn!("Dropping link '{}': {}", link.name, e);
        }
    }

    fn trace_step_started(&self, name: &str) {
        if let Err(e) = self.sink.step_started(name) {
            warn!("Dropping step trace for '{}': {}", name, e);
        }
    }

    fn trace_step_finished(&self, name: &str, status: StepStatus) {
        if let Err(e) = self.sink.step_finished(name, status) {
            warn!("Dropping step trace for '{}': {}", name, e);
        }
    }
}

/// Sink that forwards artifacts to the log facade
///
/// The out-of-the-box sink for local runs without a report backend.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl LogSink {
    /// Create a new log sink
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for LogSink {
    fn add_attachment(&self, attachment: &Attachment) -> SinkResult {
        log::info!(
            "attachment '{}' ({}, {} bytes):\n{}",
            attachment.name,
            attachment.mime_type,
            attachment.content.len(),
            attachment.content_text()
        );
        Ok(())
    }

    fn add_link(&self, link: &Link) -> SinkResult {
        log::info!("{} '{}' -> {}", link.kind.default_name(), link.name, link.url);
        Ok(())
    }

    fn step_started(&self, name: &str) -> SinkResult {
        log::info!("step '{}' started", name);
        Ok(())
    }

    fn step_finished(&self, name: &str, status: StepStatus) -> SinkResult {
        log::info!("step '{}' finished: {:?}", name, status);
        Ok(())
    }
}

/// In-memory sink recording every forwarded artifact
///
/// Intended for tests asserting what the SDK reported; shared via `Arc` with
/// the client under test.
#[derive(Debug, Default)]
pub struct RecordingSink {
    attachments: Mutex<Vec<Attachment>>,
    links: Mutex<Vec<Link>>,
    steps: Mutex<Vec<(String, StepStatus)>>,
}

impl RecordingSink {
    /// Create a new empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded attachments, in forwarding order
    pub fn attachments(&self) -> Vec<Attachment> {
        self.attachments.lock().unwrap().clone()
    }

    /// The first recorded attachment with the given name
    pub fn attachment(&self, name: &str) -> Option<Attachment> {
        self.attachments
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.name == name)
            .cloned()
    }

    /// All recorded links, in registration order
    pub fn links(&self) -> Vec<Link> {
        self.links.lock().unwrap().clone()
    }

    /// All recorded step traces as (name, outcome) pairs
    pub fn steps(&self) -> Vec<(String, StepStatus)> {
        self.steps.lock().unwrap().clone()
    }
}

impl ReportSink for RecordingSink {
    fn add_attachment(&self, attachment: &Attachment) -> SinkResult {
        self.attachments.lock().unwrap().push(attachment.clone());
        Ok(())
    }

    fn add_link(&self, link: &Link) -> SinkResult {
        self.links.lock().unwrap().push(link.clone());
        Ok(())
    }

    fn step_started(&self, _name: &str) -> SinkResult {
        Ok(())
    }

    fn step_finished(&self, name: &str, status: StepStatus) -> SinkResult {
        self.steps.lock().unwrap().push((name.to_string(), status));
        Ok(())
    }
}
