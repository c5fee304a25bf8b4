//! Minimum spacing between dispatch starts.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Grants dispatch slots no closer together than a fixed interval.
///
/// The timestamp of the last granted slot sits behind an async mutex
/// that stays held across the wait, so concurrent callers acquire slots
/// strictly one at a time: no two dispatches can start closer than the
/// interval even with multiple consumers. Time is measured on the
/// monotonic clock, so wall-clock adjustments cannot shrink the gap.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// Suspend until at least `interval` has passed since the previous
    /// granted slot, then record the new dispatch time and return. The
    /// first call returns immediately.
    pub async fn await_slot(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(prev) = *last {
            let wait = self.interval.saturating_sub(prev.elapsed());
            if !wait.is_zero() {
                debug!(
                    wait_ms = wait.as_millis() as u64,
                    "rate limiter holding next dispatch"
                );
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

// ── Tests ────────────────────────────────────────────────────────────
