use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters for one periodic task
pub struct PollMetrics {
    task_id: String,
    successes: AtomicU64,
    failures: AtomicU64,
    samples_appended: AtomicU64,
    stale_discarded: AtomicU64,
    total_latency_us: AtomicU64,
    latency_samples: AtomicU64,
}

impl PollMetrics {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            samples_appended: AtomicU64::new(0),
            stale_discarded: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn samples_appended(&self) -> u64 {
        self.samples_appended.load(Ordering::Relaxed)
    }

    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded.load(Ordering::Relaxed)
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_samples(&self, count: usize) {
        self.samples_appended.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_stale(&self) {
        self.stale_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_request(&self) -> Instant {
        Instant::now()
    }

    pub fn finish_request(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_latency_us(&self) -> u64 {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / samples
    }
}
