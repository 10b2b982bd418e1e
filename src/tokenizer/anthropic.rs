//! Anthropic Claude tokenizer implementation

use std::sync::Arc;

use async_trait::async_trait;

use super::{ensure_supported, AsyncTokenizer, ModelValidation, Tokenizer};
use crate::api::anthropic::{AnthropicClient, AsyncAnthropicClient};
use crate::config::ClientConfig;
use crate::error::TokemonResult;
use crate::model::{Provider, TokenizerResponse};
use crate::provider::{AnthropicModels, AsyncAnthropicModels, AsyncModelLister, ModelLister};
use crate::registry;

/// Claude tokenizer implementation
pub struct AnthropicTokenizer {
    model: String,
    client: AnthropicClient,
}

impl AnthropicTokenizer {
    /// Create a tokenizer configured from the environment
    pub fn new(model: &str) -> TokemonResult<Self> {
        let lister = registry::model_lister(Provider::Anthropic)?;
        Self::with_lister(model, AnthropicClient::from_env()?, lister.as_ref())
    }

    /// Create a tokenizer from explicit settings
    pub fn with_config(model: &str, config: ClientConfig) -> TokemonResult<Self> {
        let client = AnthropicClient::new(config)?;
        let lister = AnthropicModels::from_client(client.clone());
        Self::with_lister(model, client, &lister)
    }

    /// Create a tokenizer validated against the given lister
    pub fn with_lister(
        model: &str,
        client: AnthropicClient,
        lister: &dyn ModelLister,
    ) -> TokemonResult<Self> {
        ensure_supported(Provider::Anthropic, model, &lister.models()?)?;

        Ok(Self {
            model: model.to_string(),
            client,
        })
    }
}

impl Tokenizer for AnthropicTokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        let tokens = self.client.count_tokens(&self.model, text)?;
        Ok(TokenizerResponse::new(tokens, &self.model, Provider::Anthropic))
    }
}

/// Async Claude tokenizer implementation
pub struct AsyncAnthropicTokenizer {
    model: String,
    client: AsyncAnthropicClient,
    validation: ModelValidation,
}

impl AsyncAnthropicTokenizer {
    /// Create a tokenizer configured from the environment
    pub fn new(model: &str) -> TokemonResult<Self> {
        let lister = registry::async_model_lister(Provider::Anthropic)?;
        Ok(Self::with_lister(model, AsyncAnthropicClient::from_env()?, lister))
    }

    /// Create a tokenizer from explicit settings
    pub fn with_config(model: &str, config: ClientConfig) -> TokemonResult<Self> {
        let client = AsyncAnthropicClient::new(config)?;
        let lister = Arc::new(AsyncAnthropicModels::from_client(client.clone()));
        Ok(Self::with_lister(model, client, lister))
    }

    /// Create a tokenizer checked against the given lister on first use
    pub fn with_lister(
        model: &str,
        client: AsyncAnthropicClient,
        lister: Arc<dyn AsyncModelLister>,
    ) -> Self {
        Self {
            model: model.to_string(),
            client,
            validation: ModelValidation::new(lister),
        }
    }

    /// Check the model against the provider's current model list
    pub async fn ensure_supported(&self) -> TokemonResult<()> {
        self.validation.ensure(&self.model).await
    }
}

#[async_trait]
impl AsyncTokenizer for AsyncAnthropicTokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        self.ensure_supported().await?;
        let tokens = self.client.count_tokens(&self.model, text).await?;
        Ok(TokenizerResponse::new(tokens, &self.model, Provider::Anthropic))
    }
}
