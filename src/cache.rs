//! Response cache with per-entry lazy expiration.
//!
//! [`RequestCache`] stores prior responses under caller-supplied cache
//! keys. Expiration is lazy: a lookup past an entry's deadline behaves as
//! a miss, but the slot is only reclaimed by a later write to the same key
//! or by the bounded cache evicting it. Writes are last-writer-wins with
//! no ordering guarantee across concurrent writers to the same key.
//!
//! Storage is moka's sync cache, which is safe for arbitrarily many
//! simultaneous readers and writers on independent keys without a global
//! lock, and bounds the number of distinct keys so unbounded key churn
//! cannot grow memory without limit.

use std::time::{Duration, Instant};

use moka::sync::Cache;
use serde_json::{Map, Value};

use crate::telemetry;
use crate::types::Response;

/// Default bound on distinct cached keys.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Cached payload plus its expiration deadline and usage accounting.
#[derive(Debug, Clone)]
struct CacheEntry {
    text: String,
    model: String,
    metadata: Map<String, Value>,
    tokens_used: u32,
    cost: f64,
    expires_at: Instant,
}

impl CacheEntry {
    fn to_response(&self) -> Response {
        Response {
            text: self.text.clone(),
            tokens_used: self.tokens_used,
            cost: self.cost,
            cache_hit: true,
            latency: Duration::ZERO,
            model: self.model.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// In-memory cache of prior responses, keyed by cache key.
pub struct RequestCache {
    entries: Cache<String, CacheEntry>,
}

impl RequestCache {
    /// Create a cache bounded to `max_entries` distinct keys.
    pub fn new(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    /// Look up a cached response.
    ///
    /// Hits only when the key is non-empty, an entry exists, and its
    /// expiration is still in the future. The returned response is a copy
    /// with `cache_hit` set and zero latency. Emits hit/miss counters.
    pub fn get(&self, key: &str) -> Option<Response> {
        if key.is_empty() {
            return None;
        }
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.to_response())
            }
            _ => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store a response under `key`, unconditionally overwriting any
    /// existing entry. Expiration is `now + ttl`.
    pub fn insert(&self, key: &str, response: &Response, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                text: response.text.clone(),
                model: response.model.clone(),
                metadata: response.metadata.clone(),
                tokens_used: response.tokens_used,
                cost: response.cost,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}
