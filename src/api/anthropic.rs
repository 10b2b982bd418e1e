//! Anthropic Messages API client

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{async_client, blocking_client, check_async, check_blocking, LIST_PAGE_SIZE};
use crate::config::ClientConfig;
use crate::error::TokemonResult;
use crate::model::Provider;

/// API version sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const COUNT_TOKENS_PATH: &str = "/v1/messages/count_tokens";
const MODELS_PATH: &str = "/v1/models";

#[derive(Deserialize)]
struct CountTokensResponse {
    input_tokens: usize,
}

#[derive(Deserialize)]
struct ModelInfo {
    id: String,
}

#[derive(Deserialize)]
struct ModelPage {
    data: Vec<ModelInfo>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Serialize)]
struct PageQuery<'a> {
    limit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    after_id: Option<&'a str>,
}

fn count_body(model: &str, text: &str) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": text
        }]
    })
}

/// Collects page ids and returns the cursor for the next page, if any
fn absorb_page(page: ModelPage, ids: &mut Vec<String>) -> Option<String> {
    ids.extend(page.data.into_iter().map(|model| model.id));
    if page.has_more {
        page.last_id
    } else {
        None
    }
}

/// Blocking Anthropic client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Create a client from explicit settings
    pub fn new(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self {
            http: blocking_client(&config)?,
            config,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> TokemonResult<Self> {
        Self::new(ClientConfig::from_env(Provider::Anthropic))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Count the input tokens of a single user message
    pub fn count_tokens(&self, model: &str, text: &str) -> TokemonResult<usize> {
        tracing::debug!(model, chars = text.len(), "anthropic count_tokens");

        let response = self
            .http
            .post(self.config.url(COUNT_TOKENS_PATH))
            .header("x-api-key", self.config.require_api_key()?)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&count_body(model, text))
            .send()?;

        let count: CountTokensResponse = check_blocking(Provider::Anthropic, response)?.json()?;
        Ok(count.input_tokens)
    }

    /// List available model ids, following pagination
    pub fn list_models(&self) -> TokemonResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut after_id: Option<String> = None;

        loop {
            tracing::debug!(after_id = ?after_id, "anthropic list_models");
            let response = self
                .http
                .get(self.config.url(MODELS_PATH))
                .header("x-api-key", self.config.require_api_key()?)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .query(&PageQuery {
                    limit: LIST_PAGE_SIZE,
                    after_id: after_id.as_deref(),
                })
                .send()?;

            let page: ModelPage = check_blocking(Provider::Anthropic, response)?.json()?;
            match absorb_page(page, &mut ids) {
                Some(cursor) => after_id = Some(cursor),
                None => break,
            }
        }

        Ok(ids)
    }
}

/// Async Anthropic client
#[derive(Debug, Clone)]
pub struct AsyncAnthropicClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AsyncAnthropicClient {
    /// Create a client from explicit settings
    pub fn new(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self {
            http: async_client(&config)?,
            config,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> TokemonResult<Self> {
        Self::new(ClientConfig::from_env(Provider::Anthropic))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Count the input tokens of a single user message
    pub async fn count_tokens(&self, model: &str, text: &str) -> TokemonResult<usize> {
        tracing::debug!(model, chars = text.len(), "anthropic count_tokens");

        let response = self
            .http
            .post(self.config.url(COUNT_TOKENS_PATH))
            .header("x-api-key", self.config.require_api_key()?)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&count_body(model, text))
            .send()
            .await?;

        let count: CountTokensResponse = check_async(Provider::Anthropic, response)
            .await?
            .json()
            .await?;
        Ok(count.input_tokens)
    }

    /// List available model ids, following pagination
    pub async fn list_models(&self) -> TokemonResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut after_id: Option<String> = None;

        loop {
            tracing::debug!(after_id = ?after_id, "anthropic list_models");
            let response = self
                .http
                .get(self.config.url(MODELS_PATH))
                .header("x-api-key", self.config.require_api_key()?)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .query(&PageQuery {
                    limit: LIST_PAGE_SIZE,
                    after_id: after_id.as_deref(),
                })
                .send()
                .await?;

            let page: ModelPage = check_async(Provider::Anthropic, response)
                .await?
                .json()
                .await?;
            match absorb_page(page, &mut ids) {
                Some(cursor) => after_id = Some(cursor),
                None => break,
            }
        }

        Ok(ids)
    }
}
