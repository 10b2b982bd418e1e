//! Anthropic model listers

use async_trait::async_trait;

use super::{AsyncModelLister, ModelLister};
use crate::api::anthropic::{AnthropicClient, AsyncAnthropicClient};
use crate::cache::{CacheStats, ModelCache, ModelList};
use crate::config::{ClientConfig, ASYNC_MODELS_TTL};
use crate::error::TokemonResult;
use crate::model::Provider;

/// Blocking Anthropic model lister
#[derive(Debug)]
pub struct AnthropicModels {
    client: AnthropicClient,
    cache: ModelCache,
}

impl AnthropicModels {
    /// Create a lister configured from the environment
    pub fn new() -> TokemonResult<Self> {
        Self::with_config(ClientConfig::from_env(Provider::Anthropic))
    }

    /// Create a lister from explicit settings
    pub fn with_config(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self::from_client(AnthropicClient::new(config)?))
    }

    /// Wrap an existing client
    pub fn from_client(client: AnthropicClient) -> Self {
        let ttl = client.config().models_ttl;
        Self {
            client,
            cache: ModelCache::new(ttl),
        }
    }
}

impl ModelLister for AnthropicModels {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn models(&self) -> TokemonResult<ModelList> {
        self.cache.get_or_try_fetch(|| self.client.list_models())
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

/// Async Anthropic model lister
#[derive(Debug)]
pub struct AsyncAnthropicModels {
    client: AsyncAnthropicClient,
    cache: ModelCache,
}

impl AsyncAnthropicModels {
    /// Create a lister configured from the environment
    pub fn new() -> TokemonResult<Self> {
        Self::with_config(ClientConfig::from_env(Provider::Anthropic))
    }

    /// Create a lister from explicit settings
    pub fn with_config(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self::from_client(AsyncAnthropicClient::new(config)?))
    }

    /// Wrap an existing client
    pub fn from_client(client: AsyncAnthropicClient) -> Self {
        let ttl = client.config().models_ttl.unwrap_or(ASYNC_MODELS_TTL);
        Self {
            client,
            cache: ModelCache::new(Some(ttl)),
        }
    }
}

#[async_trait]
impl AsyncModelLister for AsyncAnthropicModels {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn models(&self) -> TokemonResult<ModelList> {
        if let Some(models) = self.cache.get()? {
            return Ok(models);
        }

        let models = self.client.list_models().await?;
        tracing::debug!(count = models.len(), "refreshed anthropic model list");
        self.cache.store(models)
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}
