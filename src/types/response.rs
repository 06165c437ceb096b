//! Response type

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A completed generation, with usage accounting attached.
///
/// Immutable once constructed; the cache clones responses out rather than
/// sharing them, so nothing mutates a value a caller already holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub tokens_used: u32,
    pub cost: f64,
    #[serde(default)]
    pub cache_hit: bool,
    #[serde(default)]
    pub latency: Duration,
    pub model: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}
