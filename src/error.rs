//! Bifrost error types

use std::time::Duration;

use crate::types::ProviderId;

/// Bifrost error types
#[derive(Debug, thiserror::Error)]
pub enum BifrostError {
    // Admission errors — terminal, never retried
    #[error("cost limit exceeded: {limit:.2}")]
    AdmissionDenied { limit: f64 },

    #[error("rate limit exceeded: {limit} requests/minute")]
    Throttled { limit: u32 },

    // Routing errors — terminal
    #[error("provider not found: {0}")]
    ProviderNotFound(ProviderId),

    /// The primary attempt failed (or the provider was unavailable) and no
    /// fallback chain exists for the model. Carries the primary failure
    /// when there was one.
    #[error("no fallbacks configured for model '{model}'")]
    NoFallbackConfigured {
        model: String,
        #[source]
        source: Option<Box<BifrostError>>,
    },

    /// Every candidate in the fallback chain was skipped or failed.
    /// Carries the last underlying failure.
    #[error("all fallbacks failed for model '{model}'")]
    AllFallbacksFailed {
        model: String,
        #[source]
        source: Box<BifrostError>,
    },

    /// The retry budget was spent without a success. Wraps the last
    /// underlying failure.
    #[error("retries exhausted after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<BifrostError>,
    },

    // Cancellation — propagated verbatim, short-circuits retry and fallback
    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited by provider, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BifrostError {
    /// Whether this error represents a transient provider failure that a
    /// later attempt could plausibly succeed on.
    pub fn is_transient(&self) -> bool {
        match self {
            BifrostError::Http(_) => true,
            BifrostError::Api { status, .. } => *status >= 500 || *status == 429,
            BifrostError::RateLimited { .. } => true,
            BifrostError::Unavailable(_) => true,
            _ => false,
        }
    }

    /// Whether the retry executor should attempt this operation again.
    ///
    /// Transient errors are retryable. A route that was exhausted by
    /// transient failures is retryable too, so that retry composed around
    /// the full route re-runs the primary and the whole chain. Admission
    /// and provider-lookup errors are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            BifrostError::AllFallbacksFailed { source, .. } => source.is_retryable(),
            BifrostError::NoFallbackConfigured {
                source: Some(source),
                ..
            } => source.is_retryable(),
            _ => self.is_transient(),
        }
    }

    /// Provider-supplied delay hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BifrostError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

impl From<tokio::time::error::Elapsed> for BifrostError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        BifrostError::DeadlineExceeded
    }
}

/// Result type alias for bifrost operations
pub type Result<T> = std::result::Result<T, BifrostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        assert!(BifrostError::Http("timeout".into()).is_transient());
        assert!(
            BifrostError::Api {
                status: 503,
                message: "unavailable".into()
            }
            .is_transient()
        );
        assert!(
            BifrostError::RateLimited { retry_after: None }.is_transient()
        );
    }

    #[test]
    fn client_and_admission_errors_are_not_transient() {
        assert!(
            !BifrostError::Api {
                status: 400,
                message: "bad request".into()
            }
            .is_transient()
        );
        assert!(!BifrostError::AdmissionDenied { limit: 10.0 }.is_transient());
        assert!(!BifrostError::ProviderNotFound(ProviderId::OpenAi).is_transient());
        assert!(!BifrostError::Cancelled.is_transient());
    }

    #[test]
    fn exhausted_chain_retryable_only_for_transient_cause() {
        let transient_cause = BifrostError::AllFallbacksFailed {
            model: "m1".into(),
            source: Box::new(BifrostError::Http("timeout".into())),
        };
        assert!(transient_cause.is_retryable());

        let permanent_cause = BifrostError::AllFallbacksFailed {
            model: "m1".into(),
            source: Box::new(BifrostError::InvalidInput("bad prompt".into())),
        };
        assert!(!permanent_cause.is_retryable());
    }

    #[test]
    fn missing_chain_retryable_only_when_primary_failure_was_transient() {
        let transient_primary = BifrostError::NoFallbackConfigured {
            model: "m1".into(),
            source: Some(Box::new(BifrostError::Unavailable("openai".into()))),
        };
        assert!(transient_primary.is_retryable());

        let no_primary_failure = BifrostError::NoFallbackConfigured {
            model: "m1".into(),
            source: None,
        };
        assert!(!no_primary_failure.is_retryable());
    }

    #[test]
    fn retry_after_surfaces_only_from_rate_limit() {
        let hint = Duration::from_secs(5);
        assert_eq!(
            BifrostError::RateLimited {
                retry_after: Some(hint)
            }
            .retry_after(),
            Some(hint)
        );
        assert_eq!(BifrostError::Http("timeout".into()).retry_after(), None);
    }
}
