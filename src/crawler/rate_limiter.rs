//! Global crawl-rate gate.
//!
//! One `RateLimiter` value is shared (by clone) between every fetch call so
//! that concurrent workers draw from a single request budget.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Token bucket rate limiter with a minimum inter-request interval
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
}

struct RateLimiterState {
    tokens: f64,
    last_update: Instant,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    min_interval: Duration,
    jitter: Duration,
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `requests_per_minute` - Maximum requests per minute
    /// * `min_interval` - Minimum gap between two requests
    /// * `jitter` - Upper bound of a random extra gap
    pub fn new(requests_per_minute: u32, min_interval: Duration, jitter: Duration) -> Self {
        let max_tokens = requests_per_minute.max(1) as f64;
        let refill_rate = max_tokens / 60.0;

        Self {
            state: Arc::new(Mutex::new(RateLimiterState {
                tokens: max_tokens,
                last_update: Instant::now(),
                max_tokens,
                refill_rate,
                min_interval,
                jitter,
                next_slot: None,
            })),
        }
    }

    pub fn from_config(config: &crate::config::CrawlConfig) -> Self {
        Self::new(
            config.requests_per_minute,
            Duration::from_millis(config.min_interval_ms),
            Duration::from_millis(config.jitter_ms),
        )
    }

    /// Acquire a request slot, waiting if necessary
    pub async fn acquire(&self) {
        let slot = {
            let mut state = self.state.lock().await;

            // Refill tokens
            let now = Instant::now();
            let elapsed = now.duration_since(state.last_update).as_secs_f64();
            state.tokens = (state.tokens + elapsed * state.refill_rate).min(state.max_tokens);
            state.last_update = now;

            let mut slot = state.next_slot.map_or(now, |next| next.max(now));

            if state.tokens >= 1.0 {
                state.tokens -= 1.0;
            } else {
                // Wait for token to become available
                let wait_time = (1.0 - state.tokens) / state.refill_rate;
                state.tokens = 0.0;
                slot = slot.max(now + Duration::from_secs_f64(wait_time));
            }

            // Reserve the slot before releasing the lock so concurrent
            // callers queue behind it.
            state.next_slot = Some(slot + state.min_interval + jitter(state.jitter));
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

fn jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    max.mul_f64(fastrand::f64())
}
