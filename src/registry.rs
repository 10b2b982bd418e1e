//! Process-wide model listers
//!
//! Adapters built from the environment share one lister per provider and
//! mode, so a model list is fetched once per process (or once per TTL for
//! the async listers) no matter how many tokenizers are created.

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::error::{TokemonError, TokemonResult};
use crate::model::{Mode, Provider};
use crate::provider::{
    AnthropicModels, AsyncAnthropicModels, AsyncGoogleModels, AsyncModelLister, AsyncXaiModels,
    GoogleModels, ModelLister, OpenAIModels, XaiModels,
};

static OPENAI_MODELS: Lazy<Arc<OpenAIModels>> = Lazy::new(|| Arc::new(OpenAIModels::new()));
static ANTHROPIC_MODELS: OnceCell<Arc<AnthropicModels>> = OnceCell::new();
static GOOGLE_MODELS: OnceCell<Arc<GoogleModels>> = OnceCell::new();
static XAI_MODELS: OnceCell<Arc<XaiModels>> = OnceCell::new();

static ASYNC_ANTHROPIC_MODELS: OnceCell<Arc<AsyncAnthropicModels>> = OnceCell::new();
static ASYNC_GOOGLE_MODELS: OnceCell<Arc<AsyncGoogleModels>> = OnceCell::new();
static ASYNC_XAI_MODELS: OnceCell<Arc<AsyncXaiModels>> = OnceCell::new();

/// Shared OpenAI lister
pub fn openai_models() -> &'static OpenAIModels {
    &OPENAI_MODELS
}

/// Shared blocking lister for a provider
pub fn model_lister(provider: Provider) -> TokemonResult<Arc<dyn ModelLister>> {
    let lister: Arc<dyn ModelLister> = match provider {
        Provider::OpenAI => OPENAI_MODELS.clone(),
        Provider::Anthropic => ANTHROPIC_MODELS
            .get_or_try_init(|| AnthropicModels::new().map(Arc::new))?
            .clone(),
        Provider::Google => GOOGLE_MODELS
            .get_or_try_init(|| GoogleModels::new().map(Arc::new))?
            .clone(),
        Provider::Xai => XAI_MODELS
            .get_or_try_init(|| XaiModels::new().map(Arc::new))?
            .clone(),
    };
    Ok(lister)
}

/// Shared async lister for a provider
///
/// OpenAI counts offline and has no async family.
pub fn async_model_lister(provider: Provider) -> TokemonResult<Arc<dyn AsyncModelLister>> {
    let lister: Arc<dyn AsyncModelLister> = match provider {
        Provider::OpenAI => {
            return Err(TokemonError::UnsupportedProvider(format!(
                "{}-{}",
                Mode::Async,
                provider
            )))
        }
        Provider::Anthropic => ASYNC_ANTHROPIC_MODELS
            .get_or_try_init(|| AsyncAnthropicModels::new().map(Arc::new))?
            .clone(),
        Provider::Google => ASYNC_GOOGLE_MODELS
            .get_or_try_init(|| AsyncGoogleModels::new().map(Arc::new))?
            .clone(),
        Provider::Xai => ASYNC_XAI_MODELS
            .get_or_try_init(|| AsyncXaiModels::new().map(Arc::new))?
            .clone(),
    };
    Ok(lister)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_lister_is_shared() {
        assert!(std::ptr::eq(openai_models(), openai_models()));
        assert_eq!(model_lister(Provider::OpenAI).unwrap().provider(), Provider::OpenAI);
    }

    #[test]
    fn test_blocking_listers_are_shared() {
        for provider in [
            Provider::OpenAI,
            Provider::Anthropic,
            Provider::Google,
            Provider::Xai,
        ] {
            let first = model_lister(provider).unwrap();
            let second = model_lister(provider).unwrap();

            assert_eq!(first.provider(), provider);
            assert!(Arc::ptr_eq(&first, &second));
        }
    }

    #[test]
    fn test_async_listers() {
        for provider in [Provider::Anthropic, Provider::Google, Provider::Xai] {
            let first = async_model_lister(provider).unwrap();
            let second = async_model_lister(provider).unwrap();

            assert_eq!(first.provider(), provider);
            assert!(Arc::ptr_eq(&first, &second));
        }
    }

    #[test]
    fn test_no_async_openai_lister() {
        assert!(matches!(
            async_model_lister(Provider::OpenAI),
            Err(TokemonError::UnsupportedProvider(ref key)) if key == "async-openai"
        ));
    }
}
