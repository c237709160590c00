//! Token bucket limiter for outbound generation calls.
//!
//! The hosted API enforces a per-minute quota; staying slightly under it is
//! cheaper than eating 429s. Callers beyond the instantaneous capacity
//! suspend in `acquire` until a token frees, they never fail.

use log::debug;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

pub struct RateLimiter {
    capacity: f64,
    refill_per_ms: f64,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> RateLimiter {
        let capacity = f64::from(requests_per_minute.max(1));
        RateLimiter {
            capacity,
            refill_per_ms: capacity / 60_000.0,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Takes one token, sleeping until the bucket refills when empty.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.state.lock().await;
                self.refill(&mut state);

                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }

                // Time until one full token is back.
                let deficit_ms = (1.0 - state.tokens) / self.refill_per_ms;
                Duration::from_millis(deficit_ms.ceil() as u64)
            };

            debug!("rate limited, waiting {}ms for a token", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(state.last_refill).as_millis() as f64;
        if elapsed_ms > 0.0 {
            state.tokens = (state.tokens + elapsed_ms * self.refill_per_ms).min(self.capacity);
            state.last_refill = now;
        }
    }

    #[cfg(test)]
    async fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        state.tokens
    }
}
