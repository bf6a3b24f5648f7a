//! Tests for request/response dump rendering

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

    use crate::filter::{render_request_dump, render_response_dump};

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn request_dump_starts_with_method_and_uri() {
        let dump = render_request_dump(
            Some("GET"),
            Some("http://localhost:8080/health"),
            &HeaderMap::new(),
            None,
        );

        assert!(dump.starts_with("GET http://localhost:8080/health\n"));
    }

    #[test]
    fn unset_method_and_uri_render_as_question_marks() {
        let dump = render_request_dump(None, None, &HeaderMap::new(), None);

        assert!(dump.starts_with("? ?\n"));
    }

    #[test]
    fn request_dump_has_headers_section_iff_headers_are_present() {
        let without = render_request_dump(Some("GET"), Some("/x"), &HeaderMap::new(), None);
        assert!(!without.contains("Headers:"));

        let with = render_request_dump(Some("GET"), Some("/x"), &json_headers(), None);
        assert!(with.contains("\nHeaders:\n"));
        assert!(with.contains("content-type: application/json"));
        assert!(with.contains("accept: application/json"));
    }

    #[test]
    fn request_dump_has_body_section_iff_body_is_set() {
        let without = render_request_dump(Some("POST"), Some("/x"), &HeaderMap::new(), None);
        assert!(!without.contains("Body:"));

        let with = render_request_dump(
            Some("POST"),
            Some("/x"),
            &HeaderMap::new(),
            Some("{\"a\":1}"),
        );
        assert!(with.contains("\nBody:\n{\"a\":1}\n"));
    }

    #[test]
    fn response_dump_always_carries_the_status_line() {
        let dump = render_response_dump(204, &HeaderMap::new(), Ok(&[]));

        assert!(dump.starts_with("Status: 204\n"));
    }

    #[test]
    fn response_dump_omits_body_section_for_empty_payload() {
        let dump = render_response_dump(200, &json_headers(), Ok(&[]));

        assert!(!dump.contains("Body:"));
        assert!(dump.contains("\nHeaders:\n"));
    }

    #[test]
    fn response_dump_includes_non_empty_payload_as_text() {
        let dump = render_response_dump(200, &HeaderMap::new(), Ok(b"{\"status\":\"UP\"}"));

        assert!(dump.contains("\nBody:\n{\"status\":\"UP\"}\n"));
    }

    #[test]
    fn failed_body_read_degrades_to_a_placeholder() {
        let dump = render_response_dump(200, &HeaderMap::new(), Err("connection reset"));

        assert!(dump.contains("<Failed to read response body: connection reset>"));
        assert!(!dump.contains("Body:"));
    }
}
