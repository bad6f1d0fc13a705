use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// Spaces requests out by a fixed delay, shared by every in-flight query of a batch
pub struct RateLimiter {
    delay: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            next_slot: Mutex::new(None),
        }
    }

    /// Wait for this caller's turn; the first request goes out immediately
    pub async fn wait(&self) {
        let slot = self.reserve_slot().await;
        if let Some(at) = slot {
            sleep_until(at).await;
        }
    }

    async fn reserve_slot(&self) -> Option<Instant> {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = next_slot.filter(|at| *at > now);
        *next_slot = Some(slot.unwrap_or(now) + self.delay);
        slot
    }
}
