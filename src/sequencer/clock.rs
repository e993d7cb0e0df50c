use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Scheduler abstraction for the capture countdown.
///
/// The sequencer never calls wall-clock sleeps directly, so session logic
/// is testable with logical ticks instead of real waits.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the tokio timer
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Test clock: completes every sleep immediately, records requested
/// durations, and can fire a cancellation token after a set number of
/// sleeps to exercise mid-session teardown.
pub struct ManualClock {
    sleeps: Mutex<Vec<Duration>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            cancel_after: Mutex::new(None),
        }
    }

    /// Cancel the given token once `count` sleeps have been requested
    pub fn cancel_after_sleeps(&self, count: usize, token: CancellationToken) {
        *self.cancel_after.lock() = Some((count, token));
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().len()
    }

    pub fn recorded_sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut sleeps = self.sleeps.lock();
            sleeps.push(duration);
            sleeps.len()
        };

        let fire = {
            let guard = self.cancel_after.lock();
            matches!(*guard, Some((n, _)) if count >= n)
        };
        if fire {
            if let Some((_, token)) = self.cancel_after.lock().take() {
                token.cancel();
            }
        }
    }
}
