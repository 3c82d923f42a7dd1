//! Retry with exponential backoff.
//!
//! Used by the resolver client to ride out Replicate cold starts, where a
//! prediction completes with a `null` output until the model is warm.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: usize,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (e.g., 2.0 for doubling)
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: usize, initial_delay: Duration, max_delay: Duration, multiplier: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            multiplier,
        }
    }

    /// Calculate delay for a given attempt number (0-indexed)
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        let delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}

/// Run `operation` until it succeeds, `should_retry` rejects the error, or
/// attempts run out.
pub async fn with_retry<F, Fut, T, E, P>(
    config: &RetryConfig,
    label: &str,
    should_retry: P,
    mut operation: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(label = %label, attempt, "Retry succeeded");
                }
                return Ok(result);
            }
            Err(e) if attempt < config.max_retries && should_retry(&e) => {
                let delay = config.calculate_delay(attempt);
                attempt += 1;
                warn!(
                    label = %label,
                    attempt,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, will retry"
                );
                sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
