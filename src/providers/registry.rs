//! Provider registry with fallback chain semantics.
//!
//! The `ProviderRegistry` maps provider ids to [`ModelProvider`]
//! capabilities and holds per-model fallback chains. Routing tries the
//! primary model first; on failure or unavailability it fans out over the
//! configured chain, in order, on the *same* provider.
//!
//! # Fallback semantics
//!
//! - The chain is scoped to the request's provider id; fallback never
//!   crosses a provider boundary.
//! - Resolution is exactly one level deep: a candidate's own chain is
//!   never consulted.
//! - First success wins. No scoring, cost comparison, or latency-based
//!   selection.
//!
//! # Fallback Chain Flow
//!
//! ```text
//! route_request(model = "gpt-4", provider = openai)
//!                     │
//!                     ▼
//!         ┌──────────────────────┐
//!         │  primary: "gpt-4"    │ ──► unavailable or generate() fails
//!         └─────────┬────────────┘
//!                   │ chain for "gpt-4" = ["gpt-4-mini", "gpt-3.5-turbo"]
//!                   ▼
//!         ┌──────────────────────┐
//!         │  "gpt-4-mini"        │ ──► fails
//!         └─────────┬────────────┘
//!                   ▼
//!         ┌──────────────────────┐
//!         │  "gpt-3.5-turbo"     │ ──► first success returned
//!         └──────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{instrument, warn};

use super::traits::ModelProvider;
use crate::telemetry;
use crate::types::{ProviderId, Request, Response};
use crate::{BifrostError, Result};

/// Registry of providers keyed by provider id, plus per-model fallback
/// chains.
///
/// Registration is rare and takes the exclusive lock; routing lookups are
/// frequent and take the shared lock, so concurrent routes never block on
/// each other.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<ProviderId, Arc<dyn ModelProvider>>>,
    fallbacks: RwLock<HashMap<String, Vec<String>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the provider registered under `id`.
    pub fn register_provider(&self, id: ProviderId, provider: Arc<dyn ModelProvider>) {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, provider);
    }

    /// Insert or overwrite the ordered fallback chain for `model`.
    pub fn set_fallbacks(&self, model: impl Into<String>, chain: Vec<String>) {
        self.fallbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model.into(), chain);
    }

    fn provider(&self, id: &ProviderId) -> Option<Arc<dyn ModelProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn fallback_chain(&self, model: &str) -> Option<Vec<String>> {
        self.fallbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .cloned()
    }

    /// Route a request to its provider, falling back across substitute
    /// models on failure.
    ///
    /// An unknown provider id is terminal: it is never retried and never
    /// falls back. Otherwise the primary model is attempted when the
    /// provider reports itself available; on failure or unavailability the
    /// model's chain is walked in configured order and the first success
    /// is returned.
    #[instrument(skip(self, request), fields(provider = %request.provider, model = %request.model))]
    pub async fn route_request(&self, request: &Request) -> Result<Response> {
        let start = Instant::now();
        let Some(provider) = self.provider(&request.provider) else {
            return Err(BifrostError::ProviderNotFound(request.provider.clone()));
        };

        let mut last_err = None;
        if provider.is_available() {
            match provider.generate(request).await {
                Ok(response) => {
                    Self::record_route(provider.name(), "primary", start, true);
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "primary attempt failed, consulting fallbacks"
                    );
                    last_err = Some(e);
                }
            }
        }

        self.try_fallbacks(provider.as_ref(), request, last_err, start)
            .await
    }

    /// One level of fan-out over the configured chain. Candidates whose
    /// provider is unavailable are skipped; the first success wins.
    async fn try_fallbacks(
        &self,
        provider: &dyn ModelProvider,
        request: &Request,
        mut last_err: Option<BifrostError>,
        start: Instant,
    ) -> Result<Response> {
        let Some(chain) = self.fallback_chain(&request.model) else {
            Self::record_route(provider.name(), "primary", start, false);
            return Err(BifrostError::NoFallbackConfigured {
                model: request.model.clone(),
                source: last_err.map(Box::new),
            });
        };

        for candidate in &chain {
            if !provider.is_available() {
                continue;
            }
            let derived = request.with_model(candidate);
            match provider.generate(&derived).await {
                Ok(response) => {
                    metrics::counter!(telemetry::FALLBACKS_TOTAL,
                        "provider" => provider.name().to_owned(),
                    )
                    .increment(1);
                    Self::record_route(provider.name(), "fallback", start, true);
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        candidate = candidate.as_str(),
                        error = %e,
                        "fallback candidate failed"
                    );
                    last_err = Some(e);
                }
            }
        }

        Self::record_route(provider.name(), "fallback", start, false);
        Err(BifrostError::AllFallbacksFailed {
            model: request.model.clone(),
            source: Box::new(
                last_err.unwrap_or_else(|| BifrostError::Unavailable(provider.name().to_owned())),
            ),
        })
    }

    /// Record route outcome metrics (counter + histogram).
    fn record_route(provider: &str, stage: &'static str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "stage" => stage,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned(),
            "stage" => stage,
        )
        .record(elapsed);
    }
}
