//! Request pipeline orchestration.
//!
//! [`Pipeline`] composes the admission guard, prompt filter, response
//! cache, retry executor, and router into one `process_request` call:
//!
//! ```text
//! admission ──► filter ──► cache lookup ──► retry( route_request ) ──►
//! metrics ──► cache write
//! ```
//!
//! Retry wraps the full route, so each retry attempt re-runs primary and
//! fallback resolution. A cache hit bypasses retry and routing entirely
//! and records a zero-latency outcome.

mod builder;

pub use builder::{Bifrost, BifrostBuilder};

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::admission::AdmissionGuard;
use crate::cache::RequestCache;
use crate::filter::PromptFilter;
use crate::metrics::{MetricsRegistry, MetricsSnapshot};
use crate::providers::ProviderRegistry;
use crate::retry::RetryExecutor;
use crate::types::{Request, Response};
use crate::{BifrostError, Result};

/// The assembled resilience pipeline.
///
/// One instance serves arbitrarily many concurrent requests; all shared
/// state (cache, metrics, provider maps) is internally synchronised.
pub struct Pipeline {
    guard: AdmissionGuard,
    cache: Option<RequestCache>,
    cache_ttl: Duration,
    retry: RetryExecutor,
    router: Arc<ProviderRegistry>,
    metrics: Arc<MetricsRegistry>,
    filter: Option<Arc<dyn PromptFilter>>,
    custom_headers: HeaderMap,
}

impl Pipeline {
    /// Create a new builder for configuring a pipeline.
    pub fn builder() -> BifrostBuilder {
        BifrostBuilder::new()
    }

    /// The registry to register providers and fallback chains on.
    pub fn router(&self) -> &ProviderRegistry {
        &self.router
    }

    /// Immutable copy of the cumulative usage totals.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Zero the cumulative usage totals. Totals never decrease on their
    /// own, so this is the only way to re-admit traffic after the cost
    /// ceiling has been reached.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Opaque headers for provider implementations to attach to their
    /// transport. Never interpreted by the pipeline.
    pub fn custom_headers(&self) -> &HeaderMap {
        &self.custom_headers
    }

    /// Process one request through admission, cache, retry, and routing.
    ///
    /// `token` cancels only the retry executor's inter-attempt waits; an
    /// attempt already in flight runs to its own completion. Every failure
    /// surfaces to the caller as a typed [`BifrostError`].
    #[instrument(skip(self, token, request), fields(
        request_id = %request.request_id,
        provider = %request.provider,
        model = %request.model,
    ))]
    pub async fn process_request(
        &self,
        token: &CancellationToken,
        mut request: Request,
    ) -> Result<Response> {
        let start = Instant::now();

        self.guard.check_admission()?;

        if let Some(filter) = &self.filter {
            request.prompt = filter.filter(&request.prompt);
        }

        if let (Some(cache), Some(key)) = (&self.cache, request.cache_key.as_deref())
            && let Some(cached) = cache.get(key)
        {
            self.metrics
                .record_outcome(Duration::ZERO, u64::from(cached.tokens_used), cached.cost, true);
            return Ok(Response {
                latency: start.elapsed(),
                ..cached
            });
        }

        let response = self
            .retry
            .execute(token, || self.router.route_request(&request))
            .await?;

        let latency = start.elapsed();
        self.metrics
            .record_outcome(latency, u64::from(response.tokens_used), response.cost, false);

        let response = Response {
            latency,
            cache_hit: false,
            ..response
        };

        if let (Some(cache), Some(key)) = (&self.cache, request.cache_key.as_deref()) {
            cache.insert(key, &response, self.cache_ttl);
        }

        Ok(response)
    }

    /// [`process_request`](Self::process_request) bounded by a deadline.
    ///
    /// An elapsed deadline surfaces as [`BifrostError::DeadlineExceeded`].
    pub async fn process_request_timeout(
        &self,
        deadline: Duration,
        request: Request,
    ) -> Result<Response> {
        let token = CancellationToken::new();
        tokio::time::timeout(deadline, self.process_request(&token, request))
            .await
            .map_err(BifrostError::from)?
    }

    pub(crate) fn new(
        guard: AdmissionGuard,
        cache: Option<RequestCache>,
        cache_ttl: Duration,
        retry: RetryExecutor,
        router: Arc<ProviderRegistry>,
        metrics: Arc<MetricsRegistry>,
        filter: Option<Arc<dyn PromptFilter>>,
        custom_headers: HeaderMap,
    ) -> Self {
        Self {
            guard,
            cache,
            cache_ttl,
            retry,
            router,
            metrics,
            filter,
            custom_headers,
        }
    }
}
