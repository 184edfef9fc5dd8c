use log::{debug, info};

use crate::core::DeviceConfig;
use crate::engine::{ConnectionState, Readout};

/// Notifications the pipeline sends to the user-facing side
pub trait SessionObserver: Send + Sync {
    fn on_connection_change(&self, state: ConnectionState);

    /// Fired once, on the first successful device-info fetch of the session
    fn on_config_ready(&self, config: &DeviceConfig);

    fn on_readout(&self, _readout: &Readout) {}
}

/// Observer that ignores every notification
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_connection_change(&self, _state: ConnectionState) {}

    fn on_config_ready(&self, _config: &DeviceConfig) {}
}

/// Observer that reports notifications through the log
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn on_connection_change(&self, state: ConnectionState) {
        match state {
            ConnectionState::Alive => info!("Server connected"),
            ConnectionState::Disconnected => info!("Server disconnected, waiting for it to come back"),
        }
    }

    fn on_config_ready(&self, config: &DeviceConfig) {
        let summary = config.summary();
        info!(
            "{} | {} channel(s), {} virtual | {} Hz | range {}",
            summary.device_label,
            summary.channel_count,
            summary.virtual_channel_count,
            summary.refresh_rate_hz,
            summary
                .voltage_range
                .map(|v| format!("{} V", v))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }

    fn on_readout(&self, readout: &Readout) {
        debug!(
            "last report {} | received {}",
            readout.last_report_age.as_deref().unwrap_or("--"),
            readout
                .received_rate_hz
                .map(|hz| format!("{:.2} Hz", hz))
                .unwrap_or_else(|| "--".to_string())
        );
    }
}
