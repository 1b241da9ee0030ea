//! Retry logic with exponential backoff.
//!
//! Failures decide for themselves whether they are worth retrying and how
//! hard to back off, via [`Retryable`].

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// How a failed attempt should be retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry with the normal multiplier
    Standard,
    /// Retry with the steeper multiplier (throttling responses)
    Steep,
    /// Do not retry
    Never,
}

/// Errors that know their own retry policy
pub trait Retryable {
    fn backoff(&self) -> Backoff;
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
    /// Multiplier used after a throttling response
    pub steep_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            steep_multiplier: 4.0,
        }
    }
}

impl RetryConfig {
    /// Calculate delay after a failed attempt (0-based)
    pub fn delay_for_attempt(&self, attempt: u32, backoff: Backoff) -> Duration {
        let multiplier = match backoff {
            Backoff::Standard => self.multiplier,
            Backoff::Steep => self.steep_multiplier,
            Backoff::Never => return Duration::ZERO,
        };
        let delay_ms = self.initial_delay.as_millis() as f64 * multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }
}

/// Retry an async operation with exponential backoff.
///
/// Errors whose [`Retryable::backoff`] is [`Backoff::Never`] are returned
/// immediately. Exhausting the attempt budget returns the last error.
pub async fn retry<T, E, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display + Retryable,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} retries", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) => {
                let backoff = e.backoff();
                if backoff == Backoff::Never || attempt + 1 >= attempts {
                    return Err(e);
                }
                let delay = config.delay_for_attempt(attempt, backoff);
                warn!(
                    "{} failed (attempt {}/{}): {}. Retrying in {:?}...",
                    operation_name,
                    attempt + 1,
                    attempts,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError(Backoff);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error ({:?})", self.0)
        }
    }

    impl Retryable for TestError {
        fn backoff(&self) -> Backoff {
            self.0
        }
    }

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
            multiplier: 2.0,
            steep_multiplier: 4.0,
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let config = RetryConfig::default();
        let result: Result<i32, TestError> = retry(&config, "test", || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_success_after_failures() {
        let config = fast_config(3);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<i32, TestError> = retry(&config, "test", || {
            let c = counter_clone.clone();
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(TestError(Backoff::Standard))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_all_failures() {
        let config = fast_config(3);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<i32, TestError> = retry(&config, "test", || {
            let c = counter_clone.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(TestError(Backoff::Steep))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_never_retried() {
        let config = fast_config(3);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: Result<i32, TestError> = retry(&config, "test", || {
            let c = counter_clone.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(TestError(Backoff::Never))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            steep_multiplier: 4.0,
        };

        assert_eq!(config.delay_for_attempt(0, Backoff::Standard), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1, Backoff::Standard), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2, Backoff::Standard), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(1, Backoff::Steep), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(2, Backoff::Steep), Duration::from_millis(1600));
        assert_eq!(config.delay_for_attempt(2, Backoff::Never), Duration::ZERO);
    }

    #[test]
    fn test_delay_max_cap() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            steep_multiplier: 4.0,
        };

        assert_eq!(config.delay_for_attempt(5, Backoff::Standard), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(3, Backoff::Steep), Duration::from_secs(5));
    }
}
