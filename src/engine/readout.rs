use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::rate::{RateEstimate, RefreshRateTracker};

/// Display values derived from incoming data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Readout {
    /// Device-relative time of the newest sample, `HH:MM:SS.mmm`
    pub last_report_age: Option<String>,

    /// Mean achieved sample rate across channels, in Hz
    pub received_rate_hz: Option<f64>,
}

#[derive(Default)]
struct ReadoutState {
    readout: Readout,
    rate: RefreshRateTracker,
}

/// Readout shared between the data poller and whoever displays it
#[derive(Clone, Default)]
pub struct SharedReadout {
    inner: Arc<Mutex<ReadoutState>>,
}

impl SharedReadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one poll's results in. A missing age or an all-unavailable
    /// set of estimates keeps the previous value.
    pub fn record(&self, report_age: Option<String>, estimates: &[RateEstimate]) -> Readout {
        let mut state = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(age) = report_age {
            state.readout.last_report_age = Some(age);
        }
        state.readout.received_rate_hz = state.rate.update(estimates);
        state.readout.clone()
    }

    pub fn snapshot(&self) -> Readout {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .readout
            .clone()
    }
}
