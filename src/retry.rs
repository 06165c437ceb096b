//! Bounded retry with exponential backoff and cancellation.
//!
//! [`RetryExecutor`] drives an attempt function up to a configured number
//! of times, sleeping `backoff_base * 2^attempt` after each retryable
//! failure. The inter-attempt sleep is the only cancellation point: a
//! fired [`CancellationToken`] aborts the wait immediately, but an attempt
//! already in flight runs to its own completion or timeout.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::telemetry;
use crate::{BifrostError, Result};

/// Configuration for retry behaviour.
///
/// ```rust
/// # use bifrost::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_retries(5)
///     .backoff_base(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_retries: u32,
    /// Base delay; the wait after attempt N (0-indexed) is
    /// `backoff_base * 2^N`, uncapped and without jitter. Default: 500ms.
    pub backoff_base: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_retries: 1,
            ..Self::default()
        }
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn backoff_base(mut self, delay: Duration) -> Self {
        self.backoff_base = delay;
        self
    }

    /// Backoff delay following a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Effective delay, respecting a provider `retry_after` hint from a
    /// `RateLimited` error over the computed backoff.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Executes an attempt function with bounded retries.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Run `f` up to `max_retries` times.
    ///
    /// Success returns immediately. Failures that are not retryable (see
    /// [`BifrostError::is_retryable`]) surface as-is without another
    /// attempt. After a retryable failure the executor sleeps the backoff
    /// delay; if `token` fires during that sleep, [`BifrostError::Cancelled`]
    /// is returned immediately and no further attempts run. A spent
    /// attempt budget surfaces as [`BifrostError::RetriesExhausted`]
    /// wrapping the last failure.
    pub async fn execute<F, Fut, T>(&self, token: &CancellationToken, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;
        for attempt in 0..self.config.max_retries {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() => {
                    metrics::counter!(telemetry::RETRIES_TOTAL).increment(1);
                    let delay = self.config.effective_delay(attempt, e.retry_after());
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, backing off"
                    );
                    last_err = Some(e);
                    tokio::select! {
                        _ = token.cancelled() => return Err(BifrostError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(BifrostError::RetriesExhausted {
            attempts: self.config.max_retries,
            source: Box::new(last_err.unwrap_or(BifrostError::InvalidInput(
                "retry budget of zero attempts".into(),
            ))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt_without_cap() {
        let config = RetryConfig::new().backoff_base(Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(6), Duration::from_secs(64));
    }

    #[test]
    fn retry_after_hint_overrides_backoff() {
        let config = RetryConfig::new().backoff_base(Duration::from_secs(1));
        assert_eq!(
            config.effective_delay(3, Some(Duration::from_millis(50))),
            Duration::from_millis(50)
        );
        assert_eq!(config.effective_delay(3, None), Duration::from_secs(8));
    }
}
