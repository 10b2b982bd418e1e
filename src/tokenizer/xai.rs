//! xAI Grok tokenizer implementation
//!
//! xAI has no counting endpoint; the text is tokenized remotely and the
//! returned tokens are counted.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ensure_supported, AsyncTokenizer, ModelValidation, Tokenizer};
use crate::api::xai::{AsyncXaiClient, XaiClient};
use crate::config::ClientConfig;
use crate::error::TokemonResult;
use crate::model::{Provider, TokenizerResponse};
use crate::provider::{AsyncModelLister, AsyncXaiModels, ModelLister, XaiModels};
use crate::registry;

/// Grok tokenizer implementation
pub struct XaiTokenizer {
    model: String,
    client: XaiClient,
}

impl XaiTokenizer {
    /// Create a tokenizer configured from the environment
    pub fn new(model: &str) -> TokemonResult<Self> {
        let lister = registry::model_lister(Provider::Xai)?;
        Self::with_lister(model, XaiClient::from_env()?, lister.as_ref())
    }

    /// Create a tokenizer from explicit settings
    pub fn with_config(model: &str, config: ClientConfig) -> TokemonResult<Self> {
        let client = XaiClient::new(config)?;
        let lister = XaiModels::from_client(client.clone());
        Self::with_lister(model, client, &lister)
    }

    /// Create a tokenizer validated against the given lister
    pub fn with_lister(
        model: &str,
        client: XaiClient,
        lister: &dyn ModelLister,
    ) -> TokemonResult<Self> {
        ensure_supported(Provider::Xai, model, &lister.models()?)?;

        Ok(Self {
            model: model.to_string(),
            client,
        })
    }
}

impl Tokenizer for XaiTokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::Xai
    }

    fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        let tokens = self.client.tokenize(&self.model, text)?;
        Ok(TokenizerResponse::new(tokens.len(), &self.model, Provider::Xai))
    }
}

/// Async Grok tokenizer implementation
pub struct AsyncXaiTokenizer {
    model: String,
    client: AsyncXaiClient,
    validation: ModelValidation,
}

impl AsyncXaiTokenizer {
    /// Create a tokenizer configured from the environment
    pub fn new(model: &str) -> TokemonResult<Self> {
        let lister = registry::async_model_lister(Provider::Xai)?;
        Ok(Self::with_lister(model, AsyncXaiClient::from_env()?, lister))
    }

    /// Create a tokenizer from explicit settings
    pub fn with_config(model: &str, config: ClientConfig) -> TokemonResult<Self> {
        let client = AsyncXaiClient::new(config)?;
        let lister = Arc::new(AsyncXaiModels::from_client(client.clone()));
        Ok(Self::with_lister(model, client, lister))
    }

    /// Create a tokenizer checked against the given lister on first use
    pub fn with_lister(
        model: &str,
        client: AsyncXaiClient,
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
impl AsyncTokenizer for AsyncXaiTokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::Xai
    }

    async fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        self.ensure_supported().await?;
        let tokens = self.client.tokenize(&self.model, text).await?;
        Ok(TokenizerResponse::new(tokens.len(), &self.model, Provider::Xai))
    }
}
