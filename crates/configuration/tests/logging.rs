use configuration::{LoggingConfig, init_tracing};
use std::fs;

// Installs the global subscriber, so this binary holds a single test.
#[test]
fn log_file_holds_plain_text_span_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.log");
    let config = LoggingConfig {
        level: "info".to_string(),
        file: Some(path.clone()),
    };
    init_tracing(&config, false).unwrap();

    let span = tracing::info_span!("report_run", run_id = 7);
    span.in_scope(|| tracing::error!("Preprocessing failed"));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("report_run{run_id=7}"), "{written}");
    assert!(written.contains("Preprocessing failed"));
    assert!(!written.contains('\u{1b}'), "{written:?}");
}
