//! Interception pipeline attaching request and response dumps to the report
//!
//! Every request executed through the client passes through [`intercept`]:
//! a human-readable dump of the outgoing request is attached before the
//! network call, and a dump of the response after it. Dumps are best-effort;
//! producing or forwarding them never alters the call's control flow.
//!
//! Failed calls are deliberately recorded as a request-only dump: when the
//! transport errors out there is no response to render, and the error
//! propagates to the caller unchanged.

use reqwest::header::HeaderMap;
use reqwest::{Client, Request};

use crate::client::ApiResponse;
use crate::error::Result;
use crate::report::Reporter;

/// Attachment name for the outgoing request dump
pub const REQUEST_ATTACHMENT_NAME: &str = "API Request";

/// Attachment name for the response dump
pub const RESPONSE_ATTACHMENT_NAME: &str = "API Response";

/// Execute a built request with before/after report attachments
///
/// The request dump is attached first, then the call is executed. On
/// transport failure the error propagates and no response attachment is
/// produced. On success the response dump is attached and the response
/// returned to the caller; a failed body read degrades the dump to a
/// placeholder but still emits the attachment.
pub async fn intercept(
    reporter: &Reporter,
    client: &Client,
    request: Request,
) -> Result<ApiResponse> {
    attach_request(reporter, &request);

    let response = client.execute(request).await?;

    let status = response.status().as_u16();
    let headers = response.headers().clone();

    match response.bytes().await {
        Ok(bytes) => {
            let dump = render_response_dump(status, &headers, Ok(&bytes));
            reporter.attach_text(RESPONSE_ATTACHMENT_NAME, Some(&dump));

            Ok(ApiResponse::new(status, headers, bytes.to_vec()))
        }
        Err(e) => {
            // Best-effort: the dump still carries status and headers.
            let message = e.to_string();
            let dump = render_response_dump(status, &headers, Err(&message));
            reporter.attach_text(RESPONSE_ATTACHMENT_NAME, Some(&dump));

            Err(e.into())
        }
    }
}

/// Attach the request dump for a built request
pub fn attach_request(reporter: &Reporter, request: &Request) {
    let body = request
        .body()
        .and_then(|b| b.as_bytes())
        .map(|b| String::from_utf8_lossy(b).into_owned());

    let dump = render_request_dump(
        Some(request.method().as_str()),
        Some(request.url().as_str()),
        request.headers(),
        body.as_deref(),
    );

    reporter.attach_text(REQUEST_ATTACHMENT_NAME, Some(&dump));
}

/// Render a request dump
///
/// Method and URI fall back to `?` when unset. The `Headers:` section is
/// present only if the header set is non-empty; the `Body:` section only if
/// a body is set.
pub fn render_request_dump(
    method: Option<&str>,
    uri: Option<&str>,
    headers: &HeaderMap,
    body: Option<&str>,
) -> String {
    let mut dump = String::new();

    dump.push_str(method.unwrap_or("?"));
    dump.push(' ');
    dump.push_str(uri.unwrap_or("?"));
    dump.push('\n');

    if !headers.is_empty() {
        dump.push_str("\nHeaders:\n");
        dump.push_str(&render_headers(headers));
        dump.push('\n');
    }

    if let Some(body) = body {
        dump.push_str("\nBody:\n");
        dump.push_str(body);
        dump.push('\n');
    }

    dump
}

/// Render a response dump
///
/// The status line is always present. The `Headers:` section appears only if
/// the header set is non-empty, the `Body:` section only if the payload is
/// non-empty. A failed body read is rendered as a placeholder instead.
pub fn render_response_dump(
    status: u16,
    headers: &HeaderMap,
    body: std::result::Result<&[u8], &str>,
) -> String {
    let mut dump = String::new();

    dump.push_str("Status: ");
    dump.push_str(&status.to_string());
    dump.push('\n');

    if !headers.is_empty() {
        dump.push_str("\nHeaders:\n");
        dump.push_str(&render_headers(headers));
        dump.push('\n');
    }

    match body {
        Ok(bytes) if !bytes.is_empty() => {
            dump.push_str("\nBody:\n");
            dump.push_str(&String::from_utf8_lossy(bytes));
            dump.push('\n');
        }
        Ok(_) => {}
        Err(message) => {
            dump.push_str("\n<Failed to read response body: ");
            dump.push_str(message);
            dump.push_str(">\n");
        }
    }

    dump
}

/// Render headers as one `name: value` line each, in map order
fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            format!("{}: {}", name.as_str(), String::from_utf8_lossy(value.as_bytes()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
