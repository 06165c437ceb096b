//! Pre-flight admission control.
//!
//! [`AdmissionGuard`] rejects work before any resource expenditure. Two
//! checks run, in order: the cumulative-cost ceiling (read from the shared
//! [`MetricsRegistry`], so it reflects cost already incurred by concurrent
//! in-flight and completed requests) and an optional requests-per-minute
//! token bucket. A rejected request is never attempted or retried.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::metrics::MetricsRegistry;
use crate::telemetry;
use crate::{BifrostError, Result};

/// Continuous-refill token bucket for the requests-per-minute limit.
///
/// Capacity equals the configured rpm; tokens refill at rpm/60 per second,
/// so short bursts up to the full minute budget are allowed.
#[derive(Debug)]
struct TokenBucket {
    limit: u32,
    state: Mutex<BucketState>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(limit: u32) -> Self {
        Self {
            limit,
            state: Mutex::new(BucketState {
                tokens: f64::from(limit),
                last_refill: Instant::now(),
            }),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let refill = now.duration_since(state.last_refill).as_secs_f64()
            * f64::from(self.limit)
            / 60.0;
        state.tokens = (state.tokens + refill).min(f64::from(self.limit));
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Admission check against the cost ceiling and request rate.
pub struct AdmissionGuard {
    metrics: Arc<MetricsRegistry>,
    cost_limit: f64,
    bucket: Option<TokenBucket>,
}

impl AdmissionGuard {
    /// `rate_limit` is requests per minute; `None` disables rate
    /// enforcement entirely.
    pub fn new(metrics: Arc<MetricsRegistry>, cost_limit: f64, rate_limit: Option<u32>) -> Self {
        Self {
            metrics,
            cost_limit,
            bucket: rate_limit.map(TokenBucket::new),
        }
    }

    /// Admit or reject the next request.
    ///
    /// Fails with [`BifrostError::AdmissionDenied`] once cumulative cost
    /// has reached the ceiling, and with [`BifrostError::Throttled`] when
    /// the rate bucket is empty. Runs before any provider work.
    pub fn check_admission(&self) -> Result<()> {
        if self.metrics.snapshot().estimated_cost >= self.cost_limit {
            metrics::counter!(telemetry::ADMISSION_REJECTIONS_TOTAL, "reason" => "cost")
                .increment(1);
            return Err(BifrostError::AdmissionDenied {
                limit: self.cost_limit,
            });
        }

        if let Some(bucket) = &self.bucket
            && !bucket.try_acquire()
        {
            metrics::counter!(telemetry::ADMISSION_REJECTIONS_TOTAL, "reason" => "rate")
                .increment(1);
            return Err(BifrostError::Throttled {
                limit: bucket.limit,
            });
        }

        Ok(())
    }
}
