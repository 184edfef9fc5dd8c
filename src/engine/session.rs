use anyhow::{anyhow, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use super::config_poller::ConfigPoller;
use super::data_poller::DataPoller;
use super::liveness::LivenessMonitor;
use super::readout::{Readout, SharedReadout};
use super::state::{Connection, ConnectionState};
use super::timer::PeriodicTask;
use crate::buffers::ChannelBufferStore;
use crate::config::SessionConfig;
use crate::core::{DeviceConfig, DeviceConfigCache};
use crate::observability::{MetricsCollector, PollMetrics, SessionMonitor};
use crate::transport::TelemetryTransport;
use crate::visualization::{ChartFeed, SessionObserver};

pub const DATA_TASK: &str = "data-poll";
pub const PROBE_TASK: &str = "liveness-probe";
pub const CONFIG_TASK: &str = "config-poll";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Stopped,
    Running,
}

/// Wires the three periodic tasks (data poll, liveness probe, config
/// poll) around one shared channel store and device config cache.
///
/// The liveness monitor is the only thing that stops or restarts the data
/// poll timer once the session is running.
pub struct TelemetrySession {
    store: ChannelBufferStore,
    cache: DeviceConfigCache,
    readout: SharedReadout,
    connection: watch::Receiver<Connection>,
    liveness: Arc<LivenessMonitor>,
    config_poller: Arc<ConfigPoller>,
    data_task: Arc<PeriodicTask>,
    probe_task: PeriodicTask,
    config_task: PeriodicTask,
    collector: MetricsCollector,
    status: SessionStatus,
}

impl TelemetrySession {
    pub fn new(
        config: &SessionConfig,
        transport: Arc<dyn TelemetryTransport>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let store = ChannelBufferStore::new();
        let cache = DeviceConfigCache::new();
        let readout = SharedReadout::new();
        let (connection_tx, connection_rx) = watch::channel(Connection::default());

        let data_metrics = Arc::new(PollMetrics::new(DATA_TASK));
        let probe_metrics = Arc::new(PollMetrics::new(PROBE_TASK));
        let config_metrics = Arc::new(PollMetrics::new(CONFIG_TASK));
        let mut collector = MetricsCollector::new();
        collector.register(data_metrics.clone());
        collector.register(probe_metrics.clone());
        collector.register(config_metrics.clone());

        let data_poller = Arc::new(DataPoller::new(
            transport.clone(),
            store.clone(),
            connection_rx.clone(),
            readout.clone(),
            observer.clone(),
            data_metrics,
        ));
        let data_task = Arc::new(PeriodicTask::new(
            DATA_TASK,
            config.data_poll_period(),
            move || {
                let poller = data_poller.clone();
                async move {
                    if let Err(e) = poller.poll_once().await {
                        warn!("Error fetching voltage from API: {}", e);
                    }
                }
            },
        ));

        let liveness = Arc::new(LivenessMonitor::new(
            connection_tx,
            data_task.clone(),
            observer.clone(),
            probe_metrics,
        ));
        let probe_task = {
            let liveness = liveness.clone();
            let transport = transport.clone();
            PeriodicTask::new(PROBE_TASK, config.probe_period(), move || {
                let liveness = liveness.clone();
                let transport = transport.clone();
                async move {
                    liveness.probe(transport.as_ref()).await;
                }
            })
        };

        let config_poller = Arc::new(ConfigPoller::new(
            transport,
            cache.clone(),
            observer,
            config.config_retry.clone(),
            config_metrics,
        ));
        let config_task = {
            let poller = config_poller.clone();
            PeriodicTask::new(CONFIG_TASK, config.config_poll_period(), move || {
                let poller = poller.clone();
                async move {
                    if let Err(e) = poller.poll_once().await {
                        warn!("Error retrieving device data: {}", e);
                    }
                }
            })
        };

        Self {
            store,
            cache,
            readout,
            connection: connection_rx,
            liveness,
            config_poller,
            data_task,
            probe_task,
            config_task,
            collector,
            status: SessionStatus::Stopped,
        }
    }

    /// Start all periodic tasks on the current tokio runtime
    pub fn start(&mut self) -> Result<()> {
        if self.status == SessionStatus::Running {
            return Err(anyhow!("Session is already running"));
        }

        self.data_task.reopen();
        self.probe_task.start();
        self.config_task.start();
        if self.connection_state().is_alive() {
            self.data_task.start();
        }

        self.status = SessionStatus::Running;
        info!("Telemetry session started");
        Ok(())
    }

    /// Stop all periodic tasks. Calling this on a stopped session is a no-op.
    ///
    /// The data task is closed last, so a liveness edge racing the shutdown
    /// cannot resume it.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.status == SessionStatus::Stopped {
            return Ok(());
        }

        self.probe_task.stop();
        self.config_task.stop();
        // A probe tick still finishing can no longer restart data polling
        self.data_task.close();

        self.status = SessionStatus::Stopped;
        info!("Telemetry session stopped");
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.borrow().state
    }

    pub fn subscribe(&self) -> watch::Receiver<Connection> {
        self.liveness.subscribe()
    }

    pub fn is_data_polling(&self) -> bool {
        self.data_task.is_running()
    }

    /// The data poll timer, for inspecting start/stop counts
    pub fn data_task(&self) -> &PeriodicTask {
        &self.data_task
    }

    pub fn store(&self) -> &ChannelBufferStore {
        &self.store
    }

    pub fn chart_feed(&self) -> ChartFeed {
        ChartFeed::new(self.store.clone())
    }

    pub fn device_config(&self) -> Option<Arc<DeviceConfig>> {
        self.cache.get()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.config_poller.is_bootstrapped()
    }

    pub fn readout(&self) -> Readout {
        self.readout.snapshot()
    }

    pub fn monitor(&self) -> SessionMonitor {
        SessionMonitor::new(self.collector.clone())
    }
}
