use std::collections::HashMap;

use crate::core::{ChannelId, Sample};

/// Result of estimating one channel's achieved sample rate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateEstimate {
    Hz(f64),
    /// Fewer than two samples, or no elapsed wall-clock time. The samples
    /// were carried forward to the next cycle.
    Unavailable,
}

impl RateEstimate {
    pub fn hz(&self) -> Option<f64> {
        match self {
            RateEstimate::Hz(hz) => Some(*hz),
            RateEstimate::Unavailable => None,
        }
    }
}

/// Samples held over between estimation cycles, per channel.
///
/// Carried samples belong to one connection generation and are dropped when
/// estimation resumes under another.
#[derive(Debug, Clone, Default)]
pub struct RateCarry {
    pending: HashMap<ChannelId, Vec<Sample>>,
    generation: u64,
}

impl RateCarry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: &str) -> &[Sample] {
        self.pending.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pending.values().all(Vec::is_empty)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Switch to `generation`, discarding samples carried from an earlier one
    pub fn begin_generation(&mut self, generation: u64) {
        if self.generation != generation {
            self.pending.clear();
            self.generation = generation;
        }
    }

    fn take(&mut self, channel: &str) -> Vec<Sample> {
        self.pending.remove(channel).unwrap_or_default()
    }

    fn hold(&mut self, channel: &str, samples: Vec<Sample>) {
        self.pending.insert(channel.to_string(), samples);
    }
}

pub(crate) fn round_hz(hz: f64) -> f64 {
    (hz * 100.0).round() / 100.0
}

/// Computes achieved samples/second from wall-clock receive timestamps
pub struct RateEstimator;

impl RateEstimator {
    /// Estimate the rate for one channel's new batch.
    ///
    /// Carried samples for the channel are prepended to `batch`. When the
    /// combined set cannot yield an interval it is stored back into `carry`;
    /// otherwise the channel's carry is cleared.
    pub fn estimate(channel: &str, batch: &[Sample], carry: &mut RateCarry) -> RateEstimate {
        let mut combined = carry.take(channel);
        combined.extend_from_slice(batch);

        if combined.len() <= 1 {
            carry.hold(channel, combined);
            return RateEstimate::Unavailable;
        }

        let (first, last) = match (combined.first(), combined.last()) {
            (Some(first), Some(last)) => (first.wall_clock_ms, last.wall_clock_ms),
            _ => return RateEstimate::Unavailable,
        };

        let avg_interval_ms = (last - first).abs() / (combined.len() - 1) as f64;
        if !avg_interval_ms.is_finite() || avg_interval_ms <= 0.0 {
            carry.hold(channel, combined);
            return RateEstimate::Unavailable;
        }

        RateEstimate::Hz(round_hz(1000.0 / avg_interval_ms))
    }
}

/// Scalar "received refresh rate" shown to the user.
///
/// Averages the rates produced in a cycle; a cycle without any rate leaves
/// the previously displayed value untouched.
#[derive(Debug, Clone, Default)]
pub struct RefreshRateTracker {
    displayed: Option<f64>,
}

impl RefreshRateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, estimates: &[RateEstimate]) -> Option<f64> {
        let rates: Vec<f64> = estimates.iter().filter_map(RateEstimate::hz).collect();
        if !rates.is_empty() {
            let mean = rates.iter().sum::<f64>() / rates.len() as f64;
            self.displayed = Some(round_hz(mean));
        }
        self.displayed
    }

    pub fn displayed(&self) -> Option<f64> {
        self.displayed
    }
}
