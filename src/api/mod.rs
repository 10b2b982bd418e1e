//! Thin REST clients for the vendor APIs
//!
//! Each vendor gets a blocking client (`reqwest::blocking`) and an async
//! client (`reqwest::Client`) exposing exactly the two calls tokemon needs:
//! counting tokens and listing models.

pub mod anthropic;
pub mod google;
pub mod xai;

use crate::config::ClientConfig;
use crate::error::{TokemonError, TokemonResult};
use crate::model::Provider;

/// Page size requested from paginated listing endpoints
pub(crate) const LIST_PAGE_SIZE: &str = "1000";

/// Build a blocking HTTP client for the given configuration
pub(crate) fn blocking_client(config: &ClientConfig) -> TokemonResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| TokemonError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

/// Build an async HTTP client for the given configuration
pub(crate) fn async_client(config: &ClientConfig) -> TokemonResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| TokemonError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success blocking response into an `ApiError`
pub(crate) fn check_blocking(
    provider: Provider,
    response: reqwest::blocking::Response,
) -> TokemonResult<reqwest::blocking::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .unwrap_or_else(|_| "Unable to read error message".to_string());
    Err(api_error(provider, status, body))
}

/// Turn a non-success async response into an `ApiError`
pub(crate) async fn check_async(
    provider: Provider,
    response: reqwest::Response,
) -> TokemonResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error message".to_string());
    Err(api_error(provider, status, body))
}

fn api_error(provider: Provider, status: reqwest::StatusCode, body: String) -> TokemonError {
    tracing::warn!("{} API returned error status {}", provider, status);
    TokemonError::ApiError {
        provider,
        status: status.as_u16(),
        body,
    }
}
