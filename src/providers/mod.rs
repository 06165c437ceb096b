//! Provider abstraction and routing.
//!
//! [`ModelProvider`] is the opaque capability a vendor client implements;
//! [`ProviderRegistry`] maps provider ids to those capabilities and routes
//! requests through per-model fallback chains.

pub mod registry;
pub mod traits;

pub use registry::ProviderRegistry;
pub use traits::ModelProvider;
