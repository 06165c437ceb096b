//! Shared usage metrics.
//!
//! [`MetricsRegistry`] keeps one set of cumulative totals per pipeline.
//! Writes take the exclusive lock; [`MetricsRegistry::snapshot`] takes the
//! shared lock and hands back a copy, never a live reference, so readers
//! stay isolated from later mutation. The same outcomes are mirrored to
//! the `metrics` facade under the names in [`crate::telemetry`] for
//! consumers that install a recorder.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use crate::telemetry;

/// Immutable copy of the cumulative totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub cache_hits: u64,
    /// Sum of per-request latencies; cache hits contribute zero.
    pub total_latency: Duration,
    pub tokens_used: u64,
    /// Monotonically non-decreasing absent an explicit [`MetricsRegistry::reset`].
    pub estimated_cost: f64,
}

/// Shared registry of cumulative usage totals.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    totals: RwLock<MetricsSnapshot>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed request, whichever path served it.
    pub fn record_outcome(&self, latency: Duration, tokens: u64, cost: f64, cache_hit: bool) {
        let mut totals = self
            .totals
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        totals.total_requests += 1;
        if cache_hit {
            totals.cache_hits += 1;
        }
        totals.total_latency += latency;
        totals.tokens_used += tokens;
        totals.estimated_cost += cost;
        drop(totals);

        metrics::counter!(telemetry::TOKENS_TOTAL).increment(tokens);
        metrics::histogram!(telemetry::REQUEST_COST_USD).record(cost);
    }

    /// Current totals as an immutable copy.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.totals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Zero all totals. Never called implicitly; cost only goes back down
    /// when an operator asks for it.
    pub fn reset(&self) {
        *self
            .totals
            .write()
            .unwrap_or_else(PoisonError::into_inner) = MetricsSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_accumulate() {
        let registry = MetricsRegistry::new();
        registry.record_outcome(Duration::from_millis(100), 50, 0.01, false);
        registry.record_outcome(Duration::from_millis(200), 30, 0.02, false);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.cache_hits, 0);
        assert_eq!(snapshot.total_latency, Duration::from_millis(300));
        assert_eq!(snapshot.tokens_used, 80);
        assert!((snapshot.estimated_cost - 0.03).abs() < 1e-9);
    }

    #[test]
    fn cache_hits_count_separately() {
        let registry = MetricsRegistry::new();
        registry.record_outcome(Duration::ZERO, 50, 0.01, true);
        registry.record_outcome(Duration::from_millis(80), 50, 0.01, false);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.total_latency, Duration::from_millis(80));
    }

    #[test]
    fn snapshot_is_isolated_from_later_writes() {
        let registry = MetricsRegistry::new();
        registry.record_outcome(Duration::ZERO, 10, 0.01, false);

        let snapshot = registry.snapshot();
        registry.record_outcome(Duration::ZERO, 10, 0.01, false);

        assert_eq!(snapshot.total_requests, 1);
        assert_eq!(registry.snapshot().total_requests, 2);
    }

    #[test]
    fn reset_zeroes_totals() {
        let registry = MetricsRegistry::new();
        registry.record_outcome(Duration::from_millis(5), 10, 1.5, false);
        registry.reset();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
    }
}
