//! Model listers for each provider
//!
//! A lister answers "which models does this provider support right now".
//! Blocking listers keep their first snapshot unless given a time-to-live;
//! async listers refresh after [`ASYNC_MODELS_TTL`](crate::config::ASYNC_MODELS_TTL).

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod xai;

use async_trait::async_trait;

use crate::cache::{CacheStats, ModelList};
use crate::error::TokemonResult;
use crate::model::Provider;

/// Trait for blocking model listers
pub trait ModelLister: Send + Sync {
    /// Provider this lister queries
    fn provider(&self) -> Provider;

    /// Supported model names in the vendor's order
    fn models(&self) -> TokemonResult<ModelList>;

    /// Statistics of the lister's cache
    fn cache_stats(&self) -> CacheStats;
}

/// Trait for async model listers
#[async_trait]
pub trait AsyncModelLister: Send + Sync {
    /// Provider this lister queries
    fn provider(&self) -> Provider;

    /// Supported model names in the vendor's order
    async fn models(&self) -> TokemonResult<ModelList>;

    /// Statistics of the lister's cache
    fn cache_stats(&self) -> CacheStats;
}

pub use anthropic::{AnthropicModels, AsyncAnthropicModels};
pub use google::{strip_models_prefix, AsyncGoogleModels, GoogleModels};
pub use openai::OpenAIModels;
pub use xai::{AsyncXaiModels, XaiModels};
