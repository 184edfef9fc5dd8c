use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{ChannelId, Point, Sample};
use crate::rate::RateCarry;

/// Per-channel incoming sample queues shared between the data poller
/// (producer) and the visualization (consumer).
///
/// `drain` swaps the channel's queue out under the lock, so it is a
/// point-in-time cut: an append racing a drain lands entirely before or
/// entirely after the boundary, never split and never lost.
pub struct ChannelBufferStore {
    buffers: Arc<Mutex<HashMap<ChannelId, Vec<Sample>>>>,
    carry: Arc<Mutex<RateCarry>>,
}

impl ChannelBufferStore {
    pub fn new() -> Self {
        Self {
            buffers: Arc::new(Mutex::new(HashMap::new())),
            carry: Arc::new(Mutex::new(RateCarry::new())),
        }
    }

    fn lock_buffers(&self) -> MutexGuard<'_, HashMap<ChannelId, Vec<Sample>>> {
        self.buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Concatenate `samples` onto the channel's queue, creating it if absent
    pub fn append(&self, channel: &str, samples: &[Sample]) {
        if samples.is_empty() {
            return;
        }

        let mut buffers = self.lock_buffers();
        match buffers.get_mut(channel) {
            Some(buffer) => buffer.extend_from_slice(samples),
            None => {
                buffers.insert(channel.to_string(), samples.to_vec());
            }
        }
    }

    /// Take everything queued for `channel`, leaving an empty queue behind.
    /// Unknown channels yield an empty vec.
    pub fn drain(&self, channel: &str) -> Vec<Sample> {
        let mut buffers = self.lock_buffers();
        buffers
            .get_mut(channel)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn drain_points(&self, channel: &str) -> Vec<Point> {
        self.drain(channel).iter().map(Sample::to_point).collect()
    }

    /// Snapshot of every channel that has ever been appended to
    pub fn channels(&self) -> BTreeSet<ChannelId> {
        self.lock_buffers().keys().cloned().collect()
    }

    /// Number of samples waiting in `channel`
    pub fn pending(&self, channel: &str) -> usize {
        self.lock_buffers().get(channel).map(Vec::len).unwrap_or(0)
    }

    /// Exclusive access to the rate-estimation carry slot
    pub fn carry(&self) -> MutexGuard<'_, RateCarry> {
        self.carry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ChannelBufferStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChannelBufferStore {
    fn clone(&self) -> Self {
        Self {
            buffers: self.buffers.clone(),
            carry: self.carry.clone(),
        }
    }
}
