use picostream::core::DeviceConfig;
use picostream::engine::{
    Connection, ConnectionState, LivenessMonitor, PollSwitch, Readout, Transition,
};
use picostream::observability::PollMetrics;
use picostream::transport::MockTransport;
use picostream::visualization::SessionObserver;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

#[derive(Default)]
struct CountingSwitch {
    halts: AtomicUsize,
    resumes: AtomicUsize,
}

impl PollSwitch for CountingSwitch {
    fn halt(&self) -> bool {
        self.halts.fetch_add(1, Ordering::SeqCst);
        true
    }

    fn resume(&self) -> bool {
        self.resumes.fetch_add(1, Ordering::SeqCst);
        true
    }
}

#[derive(Default)]
struct RecordingObserver {
    changes: Mutex<Vec<ConnectionState>>,
}

impl SessionObserver for RecordingObserver {
    fn on_connection_change(&self, state: ConnectionState) {
        self.changes.lock().unwrap().push(state);
    }

    fn on_config_ready(&self, _config: &DeviceConfig) {}

    fn on_readout(&self, _readout: &Readout) {}
}

fn monitor() -> (LivenessMonitor, Arc<CountingSwitch>, Arc<RecordingObserver>) {
    let (tx, _rx) = watch::channel(Connection::default());
    let switch = Arc::new(CountingSwitch::default());
    let observer = Arc::new(RecordingObserver::default());
    let monitor = LivenessMonitor::new(
        tx,
        switch.clone(),
        observer.clone(),
        Arc::new(PollMetrics::new("liveness-probe")),
    );
    (monitor, switch, observer)
}

#[test]
fn test_success_while_alive_has_no_side_effects() {
    let (monitor, switch, observer) = monitor();

    assert_eq!(monitor.observe(true), None);
    assert_eq!(monitor.observe(true), None);

    assert_eq!(monitor.state(), ConnectionState::Alive);
    assert_eq!(switch.halts.load(Ordering::SeqCst), 0);
    assert_eq!(switch.resumes.load(Ordering::SeqCst), 0);
    assert!(observer.changes.lock().unwrap().is_empty());
}

#[test]
fn test_repeated_failures_disconnect_once() {
    let (monitor, switch, observer) = monitor();

    assert_eq!(monitor.observe(false), Some(Transition::Lost));
    assert_eq!(monitor.observe(false), None);
    assert_eq!(monitor.observe(false), None);

    assert_eq!(monitor.state(), ConnectionState::Disconnected);
    assert_eq!(switch.halts.load(Ordering::SeqCst), 1);
    assert_eq!(
        *observer.changes.lock().unwrap(),
        vec![ConnectionState::Disconnected]
    );
}

#[test]
fn test_recovery_reconnects_once() {
    let (monitor, switch, observer) = monitor();

    monitor.observe(false);
    assert_eq!(monitor.observe(true), Some(Transition::Regained));
    assert_eq!(monitor.observe(true), None);

    assert_eq!(switch.halts.load(Ordering::SeqCst), 1);
    assert_eq!(switch.resumes.load(Ordering::SeqCst), 1);
    assert_eq!(
        *observer.changes.lock().unwrap(),
        vec![ConnectionState::Disconnected, ConnectionState::Alive]
    );
    assert_eq!(monitor.connection().generation, 2);
}

#[test]
fn test_subscribers_see_edges_only() {
    let (monitor, _switch, _observer) = monitor();
    let mut rx = monitor.subscribe();

    monitor.observe(true);
    assert!(!rx.has_changed().unwrap());

    monitor.observe(false);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().state, ConnectionState::Disconnected);

    monitor.observe(false);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_two_failed_probes_one_disconnect() {
    let (monitor, switch, observer) = monitor();
    let transport = MockTransport::new();
    transport.set_alive(false);

    assert_eq!(monitor.probe(&transport).await, Some(Transition::Lost));
    assert_eq!(monitor.probe(&transport).await, None);

    assert_eq!(transport.probe_calls(), 2);
    assert_eq!(switch.halts.load(Ordering::SeqCst), 1);
    assert_eq!(observer.changes.lock().unwrap().len(), 1);

    transport.set_alive(true);
    assert_eq!(monitor.probe(&transport).await, Some(Transition::Regained));
    assert_eq!(switch.resumes.load(Ordering::SeqCst), 1);
}
