use picostream::core::Sample;
use picostream::transport::{MockTransport, TelemetryTransport};

#[tokio::test]
async fn test_batches_served_in_order_then_empty() {
    let transport = MockTransport::new();
    transport.push_samples("A", vec![Sample::new(1.0, 1.0, 1.0)]);
    transport.push_samples("B", vec![Sample::new(2.0, 2.0, 2.0)]);

    let first = transport.fetch_data().await.unwrap();
    assert!(first.contains_key("A"));
    let second = transport.fetch_data().await.unwrap();
    assert!(second.contains_key("B"));

    assert!(transport.fetch_data().await.unwrap().is_empty());
    assert_eq!(transport.data_calls(), 3);
}

#[tokio::test]
async fn test_dead_server_fails_every_endpoint() {
    let transport = MockTransport::new();
    transport.push_samples("A", vec![Sample::new(1.0, 1.0, 1.0)]);
    transport.set_alive(false);

    assert!(transport.probe_alive().await.is_err());
    assert!(transport.fetch_data().await.is_err());
    assert!(transport.fetch_device_info().await.is_err());

    // Queued data survives the outage
    assert_eq!(transport.queued_batches(), 1);
}

#[tokio::test]
async fn test_missing_device_info_is_malformed() {
    let transport = MockTransport::new();
    let err = transport.fetch_device_info().await.unwrap_err();
    assert!(err.is_malformed());
}
