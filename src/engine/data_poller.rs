use log::debug;
use std::sync::Arc;
use tokio::sync::watch;

use super::readout::{Readout, SharedReadout};
use super::state::Connection;
use crate::buffers::ChannelBufferStore;
use crate::core::ChannelBatch;
use crate::error::TelemetryResult;
use crate::observability::PollMetrics;
use crate::rate::RateEstimator;
use crate::transport::TelemetryTransport;
use crate::visualization::{format_elapsed, SessionObserver};

/// What a successful data poll did with its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Appended { channels: usize, samples: usize },
    /// The connection changed while the request was in flight; the
    /// response was dropped unread.
    Discarded,
}

/// Fetches new samples and appends them to the channel store.
///
/// Failures are returned to the caller and never touch the connection
/// state; that belongs to the liveness monitor alone.
pub struct DataPoller {
    transport: Arc<dyn TelemetryTransport>,
    store: ChannelBufferStore,
    connection: watch::Receiver<Connection>,
    readout: SharedReadout,
    observer: Arc<dyn SessionObserver>,
    metrics: Arc<PollMetrics>,
}

impl DataPoller {
    pub fn new(
        transport: Arc<dyn TelemetryTransport>,
        store: ChannelBufferStore,
        connection: watch::Receiver<Connection>,
        readout: SharedReadout,
        observer: Arc<dyn SessionObserver>,
        metrics: Arc<PollMetrics>,
    ) -> Self {
        Self {
            transport,
            store,
            connection,
            readout,
            observer,
            metrics,
        }
    }

    pub async fn poll_once(&self) -> TelemetryResult<PollOutcome> {
        let issued = *self.connection.borrow();

        let start = self.metrics.start_request();
        let result = self.transport.fetch_data().await;
        self.metrics.finish_request(start);

        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                self.metrics.record_failure();
                return Err(e);
            }
        };
        self.metrics.record_success();

        // The borrow is held until the batch is stored; connection
        // transitions wait on it.
        let ingested = {
            let current = self.connection.borrow();
            if !issued.state.is_alive() || *current != issued {
                Err(current.generation)
            } else {
                Ok(self.ingest(&batch, current.generation))
            }
        };

        match ingested {
            Ok((outcome, readout)) => {
                self.observer.on_readout(&readout);
                Ok(outcome)
            }
            Err(now) => {
                self.metrics.record_stale();
                debug!(
                    "Discarding data batch fetched under connection generation {} (now {})",
                    issued.generation, now
                );
                Ok(PollOutcome::Discarded)
            }
        }
    }

    fn ingest(&self, batch: &ChannelBatch, generation: u64) -> (PollOutcome, Readout) {
        let mut samples = 0;
        let mut estimates = Vec::with_capacity(batch.len());
        {
            let mut carry = self.store.carry();
            carry.begin_generation(generation);
            for (channel, channel_samples) in batch {
                self.store.append(channel, channel_samples);
                samples += channel_samples.len();
                estimates.push(RateEstimator::estimate(channel, channel_samples, &mut carry));
            }
        }
        self.metrics.record_samples(samples);

        // All channels share one device clock, so any non-empty channel will do
        let report_age = batch
            .values()
            .find_map(|s| s.last())
            .map(|newest| format_elapsed(newest.device_time_ms));

        let readout = self.readout.record(report_age, &estimates);
        let outcome = PollOutcome::Appended {
            channels: batch.len(),
            samples,
        };
        (outcome, readout)
    }
}
