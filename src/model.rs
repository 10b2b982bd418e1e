//! Provider, mode and response definitions

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumProperty, EnumString, IntoStaticStr};

/// LLM providers with token counting support
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
    EnumProperty,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI (GPT models, counted locally with tiktoken)
    #[value(name = "openai")]
    OpenAI,

    /// Anthropic (Claude models)
    #[strum(props(
        api_key_env = "ANTHROPIC_API_KEY",
        base_url_env = "ANTHROPIC_BASE_URL",
        base_url = "https://api.anthropic.com"
    ))]
    Anthropic,

    /// xAI (Grok models)
    #[strum(props(
        api_key_env = "XAI_API_KEY",
        base_url_env = "XAI_BASE_URL",
        base_url = "https://api.x.ai"
    ))]
    Xai,

    /// Google (Gemini models)
    #[strum(props(
        api_key_env = "GOOGLE_API_KEY,GEMINI_API_KEY",
        base_url_env = "GEMINI_BASE_URL",
        base_url = "https://generativelanguage.googleapis.com"
    ))]
    Google,
}

impl Provider {
    /// Provider identifier as used in dispatch keys and responses
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Environment variables holding the API key, in lookup order
    pub fn api_key_vars(&self) -> Vec<&'static str> {
        self.get_str("api_key_env")
            .map(|vars| vars.split(',').collect())
            .unwrap_or_default()
    }

    /// Environment variable overriding the API base URL
    pub fn base_url_var(&self) -> Option<&'static str> {
        self.get_str("base_url_env")
    }

    /// Default API base URL, `None` for providers counted offline
    pub fn default_base_url(&self) -> Option<&'static str> {
        self.get_str("base_url")
    }

    /// Whether model listing and counting go over the network
    pub fn is_remote(&self) -> bool {
        self.default_base_url().is_some()
    }
}

/// Execution family selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Blocking adapters
    #[default]
    Sync,
    /// Adapters driven by an async runtime
    Async,
}

impl Mode {
    pub fn is_async(&self) -> bool {
        matches!(self, Mode::Async)
    }
}

/// Only the exact tag `async` selects the async family; every other
/// value falls back to sync.
impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        if value == "async" {
            Mode::Async
        } else {
            Mode::Sync
        }
    }
}

/// Result of a token counting operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerResponse {
    /// Number of input tokens, `None` if the vendor reports no count
    pub input_tokens: Option<usize>,
    /// Model the count was produced for
    pub model: String,
    /// Provider that produced the count
    pub provider: Provider,
}

impl TokenizerResponse {
    pub(crate) fn new(input_tokens: usize, model: &str, provider: Provider) -> Self {
        Self {
            input_tokens: Some(input_tokens),
            model: model.to_string(),
            provider,
        }
    }
}
