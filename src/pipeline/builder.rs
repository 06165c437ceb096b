//! Builder for configuring pipeline instances

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;

use super::Pipeline;
use crate::admission::AdmissionGuard;
use crate::cache::{DEFAULT_CACHE_CAPACITY, RequestCache};
use crate::filter::PromptFilter;
use crate::metrics::MetricsRegistry;
use crate::providers::ProviderRegistry;
use crate::retry::{RetryConfig, RetryExecutor};
use crate::{BifrostError, Result};

/// Main entry point for creating pipeline instances.
pub struct Bifrost;

impl Bifrost {
    /// Create a new builder for configuring the pipeline.
    pub fn builder() -> BifrostBuilder {
        BifrostBuilder::new()
    }
}

/// Builder for configuring pipeline instances.
pub struct BifrostBuilder {
    cache_ttl: Option<Duration>,
    cache_capacity: u64,
    retry: RetryConfig,
    rate_limit: Option<u32>,
    cost_limit: f64,
    custom_headers: HeaderMap,
    filter: Option<Arc<dyn PromptFilter>>,
}

impl BifrostBuilder {
    pub fn new() -> Self {
        Self {
            cache_ttl: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            retry: RetryConfig::default(),
            rate_limit: None,
            cost_limit: f64::INFINITY,
            custom_headers: HeaderMap::new(),
            filter: None,
        }
    }

    /// Enable response caching with the given time-to-live.
    ///
    /// There is no default TTL; caching stays off unless one is given.
    pub fn cache(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Bound the number of distinct cached keys (default: 10,000).
    pub fn cache_capacity(mut self, max_entries: u64) -> Self {
        self.cache_capacity = max_entries;
        self
    }

    /// Set the retry configuration (default: 3 attempts, 500ms base).
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Enforce a requests-per-minute ceiling via a token bucket.
    pub fn rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.rate_limit = Some(requests_per_minute);
        self
    }

    /// Enforce a cumulative cost ceiling. Once recorded cost reaches the
    /// limit, every later request is denied admission until an explicit
    /// metrics reset.
    pub fn cost_limit(mut self, limit: f64) -> Self {
        self.cost_limit = limit;
        self
    }

    /// Opaque headers surfaced to provider implementations.
    pub fn custom_headers(mut self, headers: HeaderMap) -> Self {
        self.custom_headers = headers;
        self
    }

    /// Install a prompt filter hook (e.g. PII redaction).
    pub fn filter(mut self, filter: Arc<dyn PromptFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Install a closure as the prompt filter hook.
    pub fn filter_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(f));
        self
    }

    /// Validate the configuration and assemble the pipeline.
    pub fn build(self) -> Result<Pipeline> {
        if self.retry.max_retries == 0 {
            return Err(BifrostError::Configuration(
                "max_retries must be at least 1".into(),
            ));
        }
        if self.cost_limit.is_nan() || self.cost_limit <= 0.0 {
            return Err(BifrostError::Configuration(
                "cost_limit must be positive".into(),
            ));
        }
        if let Some(ttl) = self.cache_ttl
            && ttl.is_zero()
        {
            return Err(BifrostError::Configuration(
                "cache TTL must be non-zero".into(),
            ));
        }

        let metrics = Arc::new(MetricsRegistry::new());
        let guard = AdmissionGuard::new(metrics.clone(), self.cost_limit, self.rate_limit);
        let cache = self
            .cache_ttl
            .map(|_| RequestCache::new(self.cache_capacity));

        Ok(Pipeline::new(
            guard,
            cache,
            self.cache_ttl.unwrap_or_default(),
            RetryExecutor::new(self.retry),
            Arc::new(ProviderRegistry::new()),
            metrics,
            self.filter,
            self.custom_headers,
        ))
    }
}

impl Default for BifrostBuilder {
    fn default() -> Self {
        Self::new()
    }
}
