//! Adapter dispatch
//!
//! Maps a (provider, mode) pair onto one of seven backends and builds the
//! matching tokenizer or model lister. The string entry points mirror the
//! dispatch table literally: the provider tag is prefixed with `async-` in
//! async mode and the combined key is looked up as is.

use std::str::FromStr;
use std::sync::Arc;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::cache::CacheStats;
use crate::config::ClientConfig;
use crate::error::{TokemonError, TokemonResult};
use crate::model::{Mode, Provider};
use crate::provider::{
    AnthropicModels, AsyncAnthropicModels, AsyncGoogleModels, AsyncModelLister, AsyncXaiModels,
    GoogleModels, ModelLister, OpenAIModels, XaiModels,
};
use crate::registry;
use crate::tokenizer::{
    AnthropicTokenizer, AsyncAnthropicTokenizer, AsyncGoogleAITokenizer, AsyncTokenizer,
    AsyncXaiTokenizer, GoogleAITokenizer, OpenAITokenizer, Tokenizer, XaiTokenizer,
};

/// One entry of the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, IntoStaticStr)]
pub enum Backend {
    #[strum(serialize = "openai")]
    OpenAI,
    #[strum(serialize = "anthropic")]
    Anthropic,
    #[strum(serialize = "async-anthropic")]
    AsyncAnthropic,
    #[strum(serialize = "xai")]
    Xai,
    #[strum(serialize = "async-xai")]
    AsyncXai,
    #[strum(serialize = "google")]
    Google,
    #[strum(serialize = "async-google")]
    AsyncGoogle,
}

/// Dispatch key for a provider tag and mode
fn dispatch_key(provider: &str, mode: Mode) -> String {
    match mode {
        Mode::Async => format!("{}-{}", Mode::Async, provider),
        Mode::Sync => provider.to_string(),
    }
}

impl Backend {
    /// Look up a raw provider tag; unknown keys fail with `UnsupportedProvider`
    pub fn lookup(provider: &str, mode: Mode) -> TokemonResult<Self> {
        let key = dispatch_key(provider, mode);
        Self::from_str(&key).map_err(|_| {
            tracing::debug!(key = %key, "no backend for dispatch key");
            TokemonError::UnsupportedProvider(key)
        })
    }

    /// Resolve a known provider and mode
    pub fn resolve(provider: Provider, mode: Mode) -> TokemonResult<Self> {
        Self::lookup(provider.as_str(), mode)
    }

    /// Every backend in the table
    pub fn all() -> impl Iterator<Item = Backend> {
        Self::iter()
    }

    /// Provider this backend talks to
    pub fn provider(&self) -> Provider {
        match self {
            Backend::OpenAI => Provider::OpenAI,
            Backend::Anthropic | Backend::AsyncAnthropic => Provider::Anthropic,
            Backend::Xai | Backend::AsyncXai => Provider::Xai,
            Backend::Google | Backend::AsyncGoogle => Provider::Google,
        }
    }

    /// Whether the backend's adapters block or await
    pub fn mode(&self) -> Mode {
        match self {
            Backend::AsyncAnthropic | Backend::AsyncXai | Backend::AsyncGoogle => Mode::Async,
            _ => Mode::Sync,
        }
    }

    /// Dispatch key, e.g. `async-anthropic`
    pub fn key(&self) -> &'static str {
        self.into()
    }
}

/// Tokenizer adapter selected by the factory
pub enum AnyTokenizer {
    Sync(Backend, Box<dyn Tokenizer>),
    Async(Backend, Box<dyn AsyncTokenizer>),
}

impl AnyTokenizer {
    /// Table entry that built this adapter
    pub fn backend(&self) -> Backend {
        match self {
            AnyTokenizer::Sync(backend, _) | AnyTokenizer::Async(backend, _) => *backend,
        }
    }

    /// Provider of the selected backend
    pub fn provider(&self) -> Provider {
        self.backend().provider()
    }

    /// Model the adapter is bound to
    pub fn model(&self) -> &str {
        match self {
            AnyTokenizer::Sync(_, tokenizer) => tokenizer.model(),
            AnyTokenizer::Async(_, tokenizer) => tokenizer.model(),
        }
    }

    /// Blocking adapter, if this is one
    pub fn as_sync(&self) -> Option<&dyn Tokenizer> {
        match self {
            AnyTokenizer::Sync(_, tokenizer) => Some(tokenizer.as_ref()),
            AnyTokenizer::Async(..) => None,
        }
    }

    /// Async adapter, if this is one
    pub fn as_async(&self) -> Option<&dyn AsyncTokenizer> {
        match self {
            AnyTokenizer::Async(_, tokenizer) => Some(tokenizer.as_ref()),
            AnyTokenizer::Sync(..) => None,
        }
    }
}

impl std::fmt::Debug for AnyTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyTokenizer")
            .field("backend", &self.backend())
            .field("model", &self.model())
            .finish()
    }
}

/// Model lister adapter selected by the factory
#[derive(Clone)]
pub enum AnyModelLister {
    Sync(Backend, Arc<dyn ModelLister>),
    Async(Backend, Arc<dyn AsyncModelLister>),
}

impl AnyModelLister {
    /// Table entry that built this lister
    pub fn backend(&self) -> Backend {
        match self {
            AnyModelLister::Sync(backend, _) | AnyModelLister::Async(backend, _) => *backend,
        }
    }

    /// Provider of the selected backend
    pub fn provider(&self) -> Provider {
        self.backend().provider()
    }

    /// Blocking lister, if this is one
    pub fn as_sync(&self) -> Option<&dyn ModelLister> {
        match self {
            AnyModelLister::Sync(_, lister) => Some(lister.as_ref()),
            AnyModelLister::Async(..) => None,
        }
    }

    /// Async lister, if this is one
    pub fn as_async(&self) -> Option<&dyn AsyncModelLister> {
        match self {
            AnyModelLister::Async(_, lister) => Some(lister.as_ref()),
            AnyModelLister::Sync(..) => None,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        match self {
            AnyModelLister::Sync(_, lister) => lister.cache_stats(),
            AnyModelLister::Async(_, lister) => lister.cache_stats(),
        }
    }
}

impl std::fmt::Debug for AnyModelLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnyModelLister")
            .field("backend", &self.backend())
            .finish()
    }
}

/// Build a tokenizer configured from the environment
pub fn build_tokenizer(model: &str, provider: Provider, mode: Mode) -> TokemonResult<AnyTokenizer> {
    tokenizer_for(model, Backend::resolve(provider, mode)?)
}

/// Build a tokenizer from explicit client settings
pub fn build_tokenizer_with(
    model: &str,
    mode: Mode,
    config: ClientConfig,
) -> TokemonResult<AnyTokenizer> {
    let backend = Backend::resolve(config.provider, mode)?;
    tracing::debug!(backend = %backend, model, "building tokenizer");

    Ok(match backend {
        Backend::OpenAI => AnyTokenizer::Sync(backend, Box::new(OpenAITokenizer::new(model)?)),
        Backend::Anthropic => AnyTokenizer::Sync(
            backend,
            Box::new(AnthropicTokenizer::with_config(model, config)?),
        ),
        Backend::Xai => AnyTokenizer::Sync(backend, Box::new(XaiTokenizer::with_config(model, config)?)),
        Backend::Google => AnyTokenizer::Sync(
            backend,
            Box::new(GoogleAITokenizer::with_config(model, config)?),
        ),
        Backend::AsyncAnthropic => AnyTokenizer::Async(
            backend,
            Box::new(AsyncAnthropicTokenizer::with_config(model, config)?),
        ),
        Backend::AsyncXai => AnyTokenizer::Async(
            backend,
            Box::new(AsyncXaiTokenizer::with_config(model, config)?),
        ),
        Backend::AsyncGoogle => AnyTokenizer::Async(
            backend,
            Box::new(AsyncGoogleAITokenizer::with_config(model, config)?),
        ),
    })
}

fn tokenizer_for(model: &str, backend: Backend) -> TokemonResult<AnyTokenizer> {
    tracing::debug!(backend = %backend, model, "building tokenizer");

    Ok(match backend {
        Backend::OpenAI => AnyTokenizer::Sync(backend, Box::new(OpenAITokenizer::new(model)?)),
        Backend::Anthropic => AnyTokenizer::Sync(backend, Box::new(AnthropicTokenizer::new(model)?)),
        Backend::Xai => AnyTokenizer::Sync(backend, Box::new(XaiTokenizer::new(model)?)),
        Backend::Google => AnyTokenizer::Sync(backend, Box::new(GoogleAITokenizer::new(model)?)),
        Backend::AsyncAnthropic => {
            AnyTokenizer::Async(backend, Box::new(AsyncAnthropicTokenizer::new(model)?))
        }
        Backend::AsyncXai => AnyTokenizer::Async(backend, Box::new(AsyncXaiTokenizer::new(model)?)),
        Backend::AsyncGoogle => {
            AnyTokenizer::Async(backend, Box::new(AsyncGoogleAITokenizer::new(model)?))
        }
    })
}

/// Get the shared model lister for a provider and mode
pub fn build_model_lister(provider: Provider, mode: Mode) -> TokemonResult<AnyModelLister> {
    model_lister_for(Backend::resolve(provider, mode)?)
}

/// Build a dedicated model lister from explicit client settings
pub fn build_model_lister_with(mode: Mode, config: ClientConfig) -> TokemonResult<AnyModelLister> {
    let backend = Backend::resolve(config.provider, mode)?;

    Ok(match backend {
        Backend::OpenAI => AnyModelLister::Sync(backend, Arc::new(OpenAIModels::new())),
        Backend::Anthropic => {
            AnyModelLister::Sync(backend, Arc::new(AnthropicModels::with_config(config)?))
        }
        Backend::Xai => AnyModelLister::Sync(backend, Arc::new(XaiModels::with_config(config)?)),
        Backend::Google => AnyModelLister::Sync(backend, Arc::new(GoogleModels::with_config(config)?)),
        Backend::AsyncAnthropic => {
            AnyModelLister::Async(backend, Arc::new(AsyncAnthropicModels::with_config(config)?))
        }
        Backend::AsyncXai => {
            AnyModelLister::Async(backend, Arc::new(AsyncXaiModels::with_config(config)?))
        }
        Backend::AsyncGoogle => {
            AnyModelLister::Async(backend, Arc::new(AsyncGoogleModels::with_config(config)?))
        }
    })
}

fn model_lister_for(backend: Backend) -> TokemonResult<AnyModelLister> {
    let provider = backend.provider();
    Ok(match backend.mode() {
        Mode::Sync => AnyModelLister::Sync(backend, registry::model_lister(provider)?),
        Mode::Async => AnyModelLister::Async(backend, registry::async_model_lister(provider)?),
    })
}

/// Build a tokenizer from a provider tag and mode tag
///
/// Any mode other than `async` selects the blocking family.
///
/// # Examples
///
/// ```
/// use tokemon::{tokemon, Tokenizer};
///
/// let tokenizer = tokemon("gpt-4o", "openai", "sync").unwrap();
/// let response = tokenizer.as_sync().unwrap().count_tokens("hello world").unwrap();
///
/// assert_eq!(response.model, "gpt-4o");
/// assert!(response.input_tokens.unwrap() > 0);
/// ```
pub fn tokemon(model: &str, provider: &str, mode: &str) -> TokemonResult<AnyTokenizer> {
    tokenizer_for(model, Backend::lookup(provider, Mode::from(mode))?)
}

/// Get a model lister from a provider tag and mode tag
pub fn tokemon_models(provider: &str, mode: &str) -> TokemonResult<AnyModelLister> {
    model_lister_for(Backend::lookup(provider, Mode::from(mode))?)
}
