//! Error types for tokemon

use std::io;
use thiserror::Error;

use crate::model::Provider;

/// Result type for tokemon operations
pub type TokemonResult<T> = Result<T, TokemonError>;

/// Errors that can occur while listing models or counting tokens
#[derive(Error, Debug)]
pub enum TokemonError {
    /// Model is not in the provider's supported set
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// No adapter exists for the provider/mode combination
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Vendor API answered with a non-success status
    #[error("{provider} API returned error status {status}: {body}")]
    ApiError {
        provider: Provider,
        status: u16,
        body: String,
    },

    /// Error from the local tokenizer library
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),

    /// Required environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarError(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to acquire lock on the model cache
    #[error("Failed to acquire lock on model cache")]
    CacheLockError,

    /// Transport-level request error
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl TokemonError {
    /// Whether the error was raised by tokemon itself rather than a vendor
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            TokemonError::UnsupportedModel(_) | TokemonError::UnsupportedProvider(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TokemonError::UnsupportedModel("gpt-9".to_string()).to_string(),
            "Unsupported model: gpt-9"
        );
        assert_eq!(
            TokemonError::UnsupportedProvider("async-openai".to_string()).to_string(),
            "Unsupported provider: async-openai"
        );

        let api = TokemonError::ApiError {
            provider: Provider::Anthropic,
            status: 401,
            body: "invalid x-api-key".to_string(),
        };
        assert_eq!(
            api.to_string(),
            "anthropic API returned error status 401: invalid x-api-key"
        );
        assert!(!api.is_unsupported());
        assert!(TokemonError::UnsupportedModel(String::new()).is_unsupported());
    }
}
