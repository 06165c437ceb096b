//! Telemetry metric name constants.
//!
//! Centralised metric names for bifrost operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bifrost_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "anthropic")
//! - `stage` — routing stage: "primary" or "fallback"
//! - `status` — outcome: "ok" or "error"
//! - `reason` — admission rejection reason: "cost" or "rate"

/// Total requests dispatched through the router.
///
/// Labels: `provider`, `stage`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "bifrost_requests_total";

/// Route duration in seconds.
///
/// Labels: `provider`, `stage`.
pub const REQUEST_DURATION_SECONDS: &str = "bifrost_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
pub const RETRIES_TOTAL: &str = "bifrost_retries_total";

/// Total requests served by a fallback candidate rather than the primary
/// model.
///
/// Labels: `provider`.
pub const FALLBACKS_TOTAL: &str = "bifrost_fallbacks_total";

/// Total tokens consumed.
pub const TOKENS_TOTAL: &str = "bifrost_tokens_total";

/// Per-request cost in USD.
pub const REQUEST_COST_USD: &str = "bifrost_request_cost_usd";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "bifrost_cache_hits_total";

/// Total cache misses.
pub const CACHE_MISSES_TOTAL: &str = "bifrost_cache_misses_total";

/// Total requests rejected before any provider work.
///
/// Labels: `reason` ("cost" | "rate").
pub const ADMISSION_REJECTIONS_TOTAL: &str = "bifrost_admission_rejections_total";
