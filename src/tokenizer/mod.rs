//! Tokenizer adapters for token counting with different providers
//!
//! Every adapter is bound to one model name that has been checked against
//! the provider's model lister. Blocking adapters check on construction,
//! async adapters on first use.

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod xai;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::{TokemonError, TokemonResult};
use crate::model::{Provider, TokenizerResponse};
use crate::provider::AsyncModelLister;

pub use anthropic::{AnthropicTokenizer, AsyncAnthropicTokenizer};
pub use google::{AsyncGoogleAITokenizer, GoogleAITokenizer};
pub use openai::OpenAITokenizer;
pub use xai::{AsyncXaiTokenizer, XaiTokenizer};

/// Trait for blocking tokenizers
pub trait Tokenizer: Send + Sync {
    /// Model this tokenizer counts for
    fn model(&self) -> &str;

    /// Provider this tokenizer counts with
    fn provider(&self) -> Provider;

    /// Count input tokens in the given text
    fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse>;
}

/// Trait for async tokenizers
#[async_trait]
pub trait AsyncTokenizer: Send + Sync {
    /// Model this tokenizer counts for
    fn model(&self) -> &str;

    /// Provider this tokenizer counts with
    fn provider(&self) -> Provider;

    /// Count input tokens in the given text
    async fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse>;
}

/// Fail with `UnsupportedModel` unless `model` is one of `models`
pub(crate) fn ensure_supported(
    provider: Provider,
    model: &str,
    models: &[String],
) -> TokemonResult<()> {
    if models.iter().any(|candidate| candidate == model) {
        tracing::debug!(%provider, model, "model supported");
        Ok(())
    } else {
        tracing::debug!(%provider, model, known = models.len(), "model not supported");
        Err(TokemonError::UnsupportedModel(model.to_string()))
    }
}

/// Deferred model check for async adapters
///
/// The check runs once, on first use; a successful outcome is remembered
/// for the life of the adapter, a failure is reported again on every call.
pub(crate) struct ModelValidation {
    lister: Arc<dyn AsyncModelLister>,
    checked: OnceCell<()>,
}

impl ModelValidation {
    pub(crate) fn new(lister: Arc<dyn AsyncModelLister>) -> Self {
        Self {
            lister,
            checked: OnceCell::new(),
        }
    }

    pub(crate) async fn ensure(&self, model: &str) -> TokemonResult<()> {
        self.checked
            .get_or_try_init(|| async {
                let models = self.lister.models().await?;
                ensure_supported(self.lister.provider(), model, &models)
            })
            .await?;
        Ok(())
    }
}
