/*!
 * Configuration handling for tokemon
 */

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::error::{TokemonError, TokemonResult};
use crate::model::{Mode, Provider};

/// Default timeout for vendor requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default lifetime of a model list fetched by an async lister
pub const ASYNC_MODELS_TTL: Duration = Duration::from_secs(300);

/// Environment variable overriding the model list lifetime (seconds)
pub const MODELS_TTL_ENV: &str = "TOKEMON_MODELS_TTL_SECS";

/// Command-line arguments for tokemon
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "tokemon",
    version = env!("CARGO_PKG_VERSION"),
    about = "Count input tokens and list models across LLM providers",
    long_about = "Counts the input tokens a text costs for a given provider and model, and lists the models each provider currently supports."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Count input tokens for a text
    Count {
        /// Provider to count with
        #[clap(short, long, value_enum)]
        provider: Provider,

        /// Model name within the provider's namespace
        #[clap(short, long)]
        model: String,

        /// Adapter family to use
        #[clap(long, value_enum, default_value_t = Mode::default())]
        mode: Mode,

        /// Read the text from a file
        #[clap(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[clap(long)]
        json: bool,

        /// Text to count (read from stdin when omitted)
        text: Option<String>,
    },

    /// List the models a provider supports
    Models {
        /// Provider to query
        #[clap(short, long, value_enum)]
        provider: Provider,

        /// Adapter family to use
        #[clap(long, value_enum, default_value_t = Mode::default())]
        mode: Mode,

        /// Emit JSON instead of a table
        #[clap(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[clap(value_enum)]
        shell: Shell,
    },
}

/// Connection settings for one provider's vendor API
#[derive(Clone)]
pub struct ClientConfig {
    /// Provider the settings apply to
    pub provider: Provider,

    /// API key, checked when a request is sent
    pub api_key: Option<String>,

    /// API base URL without trailing slash
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Lifetime of cached model lists (`None` picks the lister's default)
    pub models_ttl: Option<Duration>,
}

impl ClientConfig {
    /// Configuration with vendor defaults and no credentials
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            api_key: None,
            base_url: provider.default_base_url().unwrap_or_default().to_string(),
            timeout: DEFAULT_TIMEOUT,
            models_ttl: None,
        }
    }

    /// Configuration read from the process environment
    pub fn from_env(provider: Provider) -> Self {
        let mut config = Self::new(provider);

        config.api_key = provider
            .api_key_vars()
            .into_iter()
            .find_map(|var| env::var(var).ok().filter(|value| !value.is_empty()));

        if let Some(base_url) = provider
            .base_url_var()
            .and_then(|var| env::var(var).ok())
            .filter(|value| !value.is_empty())
        {
            config = config.with_base_url(base_url);
        }

        match env::var(MODELS_TTL_ENV).map(|value| value.parse::<u64>()) {
            Ok(Ok(secs)) => config.models_ttl = Some(Duration::from_secs(secs)),
            Ok(Err(e)) => tracing::warn!("Ignoring invalid {}: {}", MODELS_TTL_ENV, e),
            Err(_) => {}
        }

        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a custom API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the lifetime of cached model lists
    pub fn with_models_ttl(mut self, ttl: Duration) -> Self {
        self.models_ttl = Some(ttl);
        self
    }

    /// Build a full endpoint URL from a path
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// API key for a request, or an error naming the variables to set
    pub(crate) fn require_api_key(&self) -> TokemonResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            TokemonError::EnvVarError(format!(
                "{} environment variable not set",
                self.provider.api_key_vars().join(" or ")
            ))
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("models_ttl", &self.models_ttl)
            .finish()
    }
}
