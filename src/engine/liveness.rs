use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;

use super::state::{Connection, ConnectionState, Transition};
use super::timer::PollSwitch;
use crate::observability::PollMetrics;
use crate::transport::TelemetryTransport;
use crate::visualization::SessionObserver;

/// Two-state connection tracker driven by the health probe.
///
/// Side effects (data-poll timer, UI signal) fire only on edges: repeated
/// failures while disconnected, or repeated successes while alive, do
/// nothing.
pub struct LivenessMonitor {
    connection: watch::Sender<Connection>,
    data_poll: Arc<dyn PollSwitch>,
    observer: Arc<dyn SessionObserver>,
    metrics: Arc<PollMetrics>,
}

impl LivenessMonitor {
    pub fn new(
        connection: watch::Sender<Connection>,
        data_poll: Arc<dyn PollSwitch>,
        observer: Arc<dyn SessionObserver>,
        metrics: Arc<PollMetrics>,
    ) -> Self {
        Self {
            connection,
            data_poll,
            observer,
            metrics,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.borrow().state
    }

    pub fn connection(&self) -> Connection {
        *self.connection.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Connection> {
        self.connection.subscribe()
    }

    /// Apply one probe result
    pub fn observe(&self, reachable: bool) -> Option<Transition> {
        let mut transition = None;
        self.connection.send_if_modified(|connection| {
            transition = connection.state.on_probe(reachable);
            match transition {
                Some(edge) => {
                    connection.advance(edge);
                    true
                }
                None => false,
            }
        });

        match transition {
            Some(Transition::Lost) => {
                info!("Server connection lost.");
                self.data_poll.halt();
                self.observer.on_connection_change(ConnectionState::Disconnected);
            }
            Some(Transition::Regained) => {
                info!("Server connection regained.");
                self.data_poll.resume();
                self.observer.on_connection_change(ConnectionState::Alive);
            }
            None => {}
        }

        transition
    }

    /// Probe the server once and apply the result
    pub async fn probe(&self, transport: &dyn TelemetryTransport) -> Option<Transition> {
        let start = self.metrics.start_request();
        let result = transport.probe_alive().await;
        self.metrics.finish_request(start);

        match result {
            Ok(()) => {
                self.metrics.record_success();
                self.observe(true)
            }
            Err(e) => {
                self.metrics.record_failure();
                debug!("Liveness probe failed: {}", e);
                self.observe(false)
            }
        }
    }
}
