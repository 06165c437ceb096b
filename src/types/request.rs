//! Request types and the provider identifier

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier for an upstream provider.
///
/// Known vendors get dedicated variants; anything else round-trips through
/// `Custom`. Used as the registry key, so adding a vendor means registering
/// a new [`ModelProvider`](crate::providers::ModelProvider) implementation,
/// not touching the router.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Cohere,
    #[serde(untagged)]
    Custom(String),
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderId::OpenAi => f.write_str("openai"),
            ProviderId::Anthropic => f.write_str("anthropic"),
            ProviderId::Cohere => f.write_str("cohere"),
            ProviderId::Custom(name) => f.write_str(name),
        }
    }
}

/// An inbound generation request.
///
/// `cache_key` is the caller-supplied cacheable identity; when absent the
/// request is never cached. `metadata` preserves insertion order through
/// serialization (serde_json `preserve_order`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub prompt: String,
    pub model: String,
    pub provider: ProviderId,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Request {
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        provider: ProviderId,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            provider,
            temperature: 0.0,
            max_tokens: 0,
            metadata: Map::new(),
            cache_key: None,
            request_id: String::new(),
            user_id: None,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = id.into();
        self
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Derived request for a fallback candidate: same provider, substituted
    /// model name.
    pub(crate) fn with_model(&self, model: &str) -> Self {
        let mut derived = self.clone();
        derived.model = model.to_string();
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_id_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProviderId::Anthropic).unwrap(),
            "\"anthropic\""
        );
        assert_eq!(
            serde_json::to_string(&ProviderId::Custom("mistral".into())).unwrap(),
            "\"mistral\""
        );
    }

    #[test]
    fn provider_id_round_trips_unknown_vendors() {
        let id: ProviderId = serde_json::from_str("\"mistral\"").unwrap();
        assert_eq!(id, ProviderId::Custom("mistral".into()));

        let id: ProviderId = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(id, ProviderId::OpenAi);
    }

    #[test]
    fn metadata_preserves_insertion_order() {
        let request = Request::new("hi", "gpt-4", ProviderId::OpenAi)
            .metadata("purpose", "education")
            .metadata("source", "web-app")
            .metadata("attempt", 1);

        let keys: Vec<_> = request.metadata.keys().cloned().collect();
        assert_eq!(keys, ["purpose", "source", "attempt"]);

        let json = serde_json::to_string(&request).unwrap();
        let parsed: Request = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = parsed.metadata.keys().cloned().collect();
        assert_eq!(keys, ["purpose", "source", "attempt"]);
    }

    #[test]
    fn derived_request_substitutes_only_the_model() {
        let request = Request::new("hi", "gpt-4", ProviderId::OpenAi)
            .cache_key("k1")
            .request_id("req-1");
        let derived = request.with_model("gpt-3.5-turbo");

        assert_eq!(derived.model, "gpt-3.5-turbo");
        assert_eq!(derived.provider, request.provider);
        assert_eq!(derived.prompt, request.prompt);
        assert_eq!(derived.cache_key, request.cache_key);
    }
}
