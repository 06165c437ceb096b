//! Provider capability boundary.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Request, Response};

/// A single upstream LLM backend.
///
/// Implementations are external collaborators (vendor-specific clients);
/// the core never constructs HTTP requests itself and treats `generate`
/// as an opaque call. Vendor variants are registered in the
/// [`ProviderRegistry`](super::ProviderRegistry) and dispatched uniformly.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name for logs and metrics.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    async fn generate(&self, request: &Request) -> Result<Response>;

    /// Whether the provider is currently able to serve requests.
    fn is_available(&self) -> bool;
}
