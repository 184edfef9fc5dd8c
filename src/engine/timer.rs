use log::debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

type TickFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type TickFn = Arc<dyn Fn() -> TickFuture + Send + Sync>;

/// Switch through which the liveness monitor gates data polling
pub trait PollSwitch: Send + Sync {
    /// Stop polling. Returns false if polling was already stopped.
    fn halt(&self) -> bool;

    /// Start polling. Returns false if polling was already running.
    fn resume(&self) -> bool;
}

/// A named periodic task owning at most one running timer.
///
/// Each tick is awaited before the next one is scheduled, so a task never
/// has more than one request in flight. `start` on a running task and
/// `stop` on a stopped one are no-ops. A closed task refuses to start until
/// reopened.
pub struct PeriodicTask {
    name: String,
    period: Duration,
    tick: TickFn,
    handle: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    starts: AtomicU64,
    stops: AtomicU64,
}

impl PeriodicTask {
    pub fn new<F, Fut>(name: impl Into<String>, period: Duration, tick: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            name: name.into(),
            period,
            tick: Arc::new(move || Box::pin(tick()) as TickFuture),
            handle: Mutex::new(None),
            closed: AtomicBool::new(false),
            starts: AtomicU64::new(0),
            stops: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the timer on the current tokio runtime. The first tick fires
    /// immediately.
    pub fn start(&self) -> bool {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.closed.load(Ordering::SeqCst)
            || handle.as_ref().is_some_and(|h| !h.is_finished())
        {
            return false;
        }

        let tick = self.tick.clone();
        let period = self.period;
        *handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick().await;
            }
        }));

        self.starts.fetch_add(1, Ordering::SeqCst);
        debug!("{} timer started ({:?})", self.name, self.period);
        true
    }

    /// Cancel the timer, dropping any in-flight tick
    pub fn stop(&self) -> bool {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match handle {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                self.stops.fetch_add(1, Ordering::SeqCst);
                debug!("{} timer stopped", self.name);
                true
            }
            _ => false,
        }
    }

    /// Stop the timer and refuse further starts until `reopen`
    pub fn close(&self) -> bool {
        let handle = {
            let mut handle = self
                .handle
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            self.closed.store(true, Ordering::SeqCst);
            handle.take()
        };

        match handle {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                self.stops.fetch_add(1, Ordering::SeqCst);
                debug!("{} timer closed", self.name);
                true
            }
            _ => false,
        }
    }

    pub fn reopen(&self) {
        let _handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.closed.store(false, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub fn start_count(&self) -> u64 {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> u64 {
        self.stops.load(Ordering::SeqCst)
    }
}

impl PollSwitch for PeriodicTask {
    fn halt(&self) -> bool {
        self.stop()
    }

    fn resume(&self) -> bool {
        self.start()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self
            .handle
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_task(period_ms: u64) -> (PeriodicTask, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let task = PeriodicTask::new("test", Duration::from_millis(period_ms), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, ticks)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_stopped() {
        let (task, ticks) = counting_task(100);
        assert!(task.start());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(task.stop());
        let seen = ticks.load(Ordering::SeqCst);
        assert_eq!(seen, 4); // t = 0, 100, 200, 300

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_keeps_one_timer() {
        let (task, ticks) = counting_task(100);
        assert!(task.start());
        assert!(!task.start());
        assert_eq!(task.start_count(), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_task_refuses_resume() {
        let (task, ticks) = counting_task(100);
        assert!(task.start());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(task.close());
        assert!(!task.resume());
        assert!(!task.is_running());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        task.reopen();
        assert!(task.resume());
        assert_eq!(task.start_count(), 2);
        assert_eq!(task.stop_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let (task, _) = counting_task(100);
        assert!(!task.stop());
        assert_eq!(task.stop_count(), 0);
        assert!(!task.is_running());
    }
}
