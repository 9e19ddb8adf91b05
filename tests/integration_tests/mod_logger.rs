use h5sweep::logger::{METRICS_TARGET, configure_logging};
use std::fs;
use tempfile::tempdir;

#[test]
fn configure_logging_writes_app_and_metrics_in_dir() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("proc_logs");
    configure_logging(Some(&base), Some("debug"), Some(3)).unwrap();
    log::info!("hello app");
    log::info!(target: METRICS_TARGET, "{{\"package\":\"native (memory)\"}}");
    assert!(base.join("app.log").exists());
    assert!(base.join("metrics.log").exists());

    // Reconfiguring replaces the previous setup instead of failing.
    configure_logging(None, Some("warn"), None).unwrap();
    assert!(fs::metadata(base.join("app.log")).is_ok());
}
