use picostream::observability::{MetricsCollector, PollMetrics, SessionMonitor};
use std::sync::Arc;

#[test]
fn test_metrics_creation() {
    let metrics = PollMetrics::new("data-poll");
    assert_eq!(metrics.task_id(), "data-poll");
    assert_eq!(metrics.successes(), 0);
    assert_eq!(metrics.failures(), 0);
    assert_eq!(metrics.avg_latency_us(), 0);
}

#[test]
fn test_metrics_increment() {
    let metrics = Arc::new(PollMetrics::new("data-poll"));

    metrics.record_success();
    metrics.record_success();
    metrics.record_failure();
    metrics.record_samples(12);
    metrics.record_samples(3);
    metrics.record_stale();

    assert_eq!(metrics.successes(), 2);
    assert_eq!(metrics.failures(), 1);
    assert_eq!(metrics.samples_appended(), 15);
    assert_eq!(metrics.stale_discarded(), 1);
}

#[tokio::test]
async fn test_metrics_latency_tracking() {
    let metrics = PollMetrics::new("liveness-probe");

    let start = metrics.start_request();
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    metrics.finish_request(start);

    assert!(metrics.avg_latency_us() >= 10_000);
}

#[test]
fn test_collector_snapshot_and_report() {
    let data = Arc::new(PollMetrics::new("data-poll"));
    let probe = Arc::new(PollMetrics::new("liveness-probe"));
    let mut collector = MetricsCollector::new();
    collector.register(data.clone());
    collector.register(probe.clone());

    data.record_success();
    data.record_samples(40);
    probe.record_failure();

    let snapshot = collector.snapshot();
    assert_eq!(snapshot["data-poll"].samples_appended, 40);
    assert_eq!(snapshot["liveness-probe"].failures, 1);
    assert!(collector.get("config-poll").is_none());

    let report = SessionMonitor::new(collector).generate_report();
    assert!(report.contains("[data-poll]"));
    assert!(report.contains("40 appended"));
    assert!(report.contains("1 failure"));
}

#[test]
fn test_empty_report() {
    let monitor = SessionMonitor::new(MetricsCollector::new());
    assert_eq!(monitor.generate_report(), "No tasks registered");
}
