//! Tests for the reporting primitives and their defaulting rules

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::ApiError;
    use crate::report::{
        Attachment, Link, LinkKind, RecordingSink, Reporter, ReportSink, SinkResult, StepStatus,
    };

    fn recording_reporter() -> (Arc<RecordingSink>, Reporter) {
        let sink = Arc::new(RecordingSink::new());
        let reporter = Reporter::new(sink.clone());
        (sink, reporter)
    }

    #[test]
    fn attach_text_uses_plain_text_defaults() {
        let (sink, reporter) = recording_reporter();

        reporter.attach_text("request log", Some("hello"));

        let attachment = sink.attachment("request log").unwrap();
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.extension, ".txt");
        assert_eq!(attachment.content_text(), "hello");
    }

    #[test]
    fn absent_text_content_renders_as_null_literal() {
        let (sink, reporter) = recording_reporter();

        reporter.attach_text("empty", None);
        reporter.attach_json("empty-json", None);

        assert_eq!(sink.attachment("empty").unwrap().content_text(), "null");
        assert_eq!(sink.attachment("empty-json").unwrap().content_text(), "null");
    }

    #[test]
    fn attach_json_forwards_content_verbatim_without_validation() {
        let (sink, reporter) = recording_reporter();

        reporter.attach_json("broken", Some("{not json"));

        let attachment = sink.attachment("broken").unwrap();
        assert_eq!(attachment.mime_type, "application/json");
        assert_eq!(attachment.extension, ".json");
        assert_eq!(attachment.content_text(), "{not json");
    }

    #[test]
    fn attach_bytes_applies_defaults_for_blank_inputs() {
        let (sink, reporter) = recording_reporter();

        reporter.attach_bytes("blob", "", None, "");

        let attachment = sink.attachment("blob").unwrap();
        assert_eq!(attachment.mime_type, "application/octet-stream");
        assert_eq!(attachment.extension, ".bin");
        assert!(attachment.content.is_empty());
    }

    #[test]
    fn attach_bytes_keeps_explicit_values() {
        let (sink, reporter) = recording_reporter();

        reporter.attach_bytes("shot", "image/png", Some(&[1, 2, 3]), ".png");

        let attachment = sink.attachment("shot").unwrap();
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.extension, ".png");
        assert_eq!(attachment.content, vec![1, 2, 3]);
    }

    #[test]
    fn blank_link_identifiers_default_per_kind() {
        let (sink, reporter) = recording_reporter();

        reporter.link("", Some("https://example.com/spec"));
        reporter.issue("", Some("https://example.com/jira"));
        reporter.tms("  ", Some("https://example.com/tms"));

        let links = sink.links();
        assert_eq!(links[0].name, "link");
        assert_eq!(links[1].name, "issue");
        assert_eq!(links[2].name, "tms");
    }

    #[test]
    fn absent_url_defaults_to_empty_string() {
        let (sink, reporter) = recording_reporter();

        reporter.issue("", None);

        let links = sink.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, LinkKind::Issue);
        assert_eq!(links[0].name, "issue");
        assert_eq!(links[0].url, "");
    }

    #[test]
    fn explicit_link_identifiers_are_kept() {
        let (sink, reporter) = recording_reporter();

        reporter.issue("JIRA-123", Some("https://example.com/jira/JIRA-123"));
        reporter.tms("TC-456", Some("https://example.com/tms/TC-456"));

        let links = sink.links();
        assert_eq!(links[0].name, "JIRA-123");
        assert_eq!(links[1].name, "TC-456");
    }

    #[test]
    fn step_returns_the_action_result_and_traces_success() {
        let (sink, reporter) = recording_reporter();

        let value = reporter
            .step("add numbers", || Ok::<_, anyhow::Error>(2 + 2))
            .unwrap();

        assert_eq!(value, 4);
        assert_eq!(sink.steps(), vec![("add numbers".to_string(), StepStatus::Passed)]);
    }

    #[test]
    fn failed_step_preserves_the_original_error_as_cause() {
        let (sink, reporter) = recording_reporter();

        let result: crate::Result<()> = reporter.step("read file", || {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        });

        let err = result.unwrap_err();
        assert!(err.step_cause().is_some());
        match &err {
            ApiError::Step { name, source } => {
                assert_eq!(name, "read file");
                let io = source.downcast_ref::<std::io::Error>().unwrap();
                assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected step error, got {other}"),
        }

        assert_eq!(sink.steps(), vec![("read file".to_string(), StepStatus::Failed)]);
    }

    #[tokio::test]
    async fn async_step_awaits_the_action() {
        let (sink, reporter) = recording_reporter();

        let value = reporter
            .step_async("fetch", || async { Ok::<_, anyhow::Error>("done") })
            .await
            .unwrap();

        assert_eq!(value, "done");
        assert_eq!(sink.steps(), vec![("fetch".to_string(), StepStatus::Passed)]);
    }

    /// Sink that fails every operation, for exercising the best-effort boundary
    struct FailingSink;

    impl ReportSink for FailingSink {
        fn add_attachment(&self, _attachment: &Attachment) -> SinkResult {
            Err("backend unavailable".into())
        }

        fn add_link(&self, _link: &Link) -> SinkResult {
            Err("backend unavailable".into())
        }

        fn step_started(&self, _name: &str) -> SinkResult {
            Err("backend unavailable".into())
        }

        fn step_finished(&self, _name: &str, _status: StepStatus) -> SinkResult {
            Err("backend unavailable".into())
        }
    }

    #[test]
    fn sink_failures_never_reach_the_caller() {
        let reporter = Reporter::new(Arc::new(FailingSink));

        reporter.attach_text("lost", Some("content"));
        reporter.attach_bytes("lost bytes", "", None, "");
        reporter.link("spec", Some("https://example.com"));
        reporter.issue("JIRA-1", None);

        // The step action still runs and its result is still returned.
        let value = reporter
            .step("still runs", || Ok::<_, anyhow::Error>(41 + 1))
            .unwrap();
        assert_eq!(value, 42);
    }
}
