//! Bifrost - Resilience and routing layer for upstream LLM backends
//!
//! This crate sits between an application and one or more LLM providers.
//! It enforces cost and rate admission control, deduplicates identical
//! requests through a response cache, retries transient provider failures
//! with exponential backoff, and falls back across alternative models when
//! a primary call fails. The actual provider call is an opaque capability:
//! vendor clients implement [`ModelProvider`] and register themselves; the
//! core never builds HTTP requests itself.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use bifrost::{Bifrost, ProviderId, Request, RetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # struct MyClient;
//! # #[async_trait::async_trait]
//! # impl bifrost::ModelProvider for MyClient {
//! #     fn name(&self) -> &str { "openai" }
//! #     async fn generate(&self, _: &bifrost::Request) -> bifrost::Result<bifrost::Response> {
//! #         unimplemented!()
//! #     }
//! #     fn is_available(&self) -> bool { true }
//! # }
//! #[tokio::main]
//! async fn main() -> bifrost::Result<()> {
//!     let pipeline = Bifrost::builder()
//!         .cache(Duration::from_secs(3600))
//!         .retry(RetryConfig::new().max_retries(3))
//!         .cost_limit(50.0)
//!         .rate_limit(100)
//!         .build()?;
//!
//!     pipeline
//!         .router()
//!         .register_provider(ProviderId::OpenAi, Arc::new(MyClient));
//!     pipeline
//!         .router()
//!         .set_fallbacks("gpt-4", vec!["gpt-3.5-turbo".into()]);
//!
//!     let request = Request::new("Explain quantum computing", "gpt-4", ProviderId::OpenAi)
//!         .max_tokens(100)
//!         .cache_key("quantum-intro")
//!         .request_id("req-123");
//!
//!     let response = pipeline
//!         .process_request(&CancellationToken::new(), request)
//!         .await?;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

pub mod admission;
pub mod cache;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod providers;
pub mod retry;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{BifrostError, Result};
pub use filter::PromptFilter;
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use pipeline::{Bifrost, BifrostBuilder, Pipeline};
pub use providers::{ModelProvider, ProviderRegistry};
pub use retry::{RetryConfig, RetryExecutor};
pub use types::{ProviderId, Request, Response};
