//! Google Gemini API client

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{async_client, blocking_client, check_async, check_blocking, LIST_PAGE_SIZE};
use crate::config::ClientConfig;
use crate::error::TokemonResult;
use crate::model::Provider;

const MODELS_PATH: &str = "/v1beta/models";

// proto3 JSON drops zero-valued fields, so an empty text yields `{}`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountTokensResponse {
    #[serde(default)]
    total_tokens: usize,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPage {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery<'a> {
    page_size: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

fn count_url(config: &ClientConfig, model: &str) -> String {
    config.url(&format!("{}/{}:countTokens", MODELS_PATH, model))
}

fn count_body(text: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": text}]
        }]
    })
}

/// Collects raw model names and returns the next page token, if any
fn absorb_page(page: ModelPage, names: &mut Vec<String>) -> Option<String> {
    names.extend(page.models.into_iter().map(|model| model.name));
    page.next_page_token.filter(|token| !token.is_empty())
}

/// Blocking Gemini client
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl GoogleClient {
    /// Create a client from explicit settings
    pub fn new(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self {
            http: blocking_client(&config)?,
            config,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> TokemonResult<Self> {
        Self::new(ClientConfig::from_env(Provider::Google))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Count the total tokens of a single user content
    pub fn count_tokens(&self, model: &str, text: &str) -> TokemonResult<usize> {
        tracing::debug!(model, chars = text.len(), "google countTokens");

        let response = self
            .http
            .post(count_url(&self.config, model))
            .header("x-goog-api-key", self.config.require_api_key()?)
            .json(&count_body(text))
            .send()?;

        let count: CountTokensResponse = check_blocking(Provider::Google, response)?.json()?;
        Ok(count.total_tokens)
    }

    /// List raw model resource names (`models/...`), following pagination
    pub fn list_models(&self) -> TokemonResult<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            tracing::debug!(page_token = ?page_token, "google list models");
            let response = self
                .http
                .get(self.config.url(MODELS_PATH))
                .header("x-goog-api-key", self.config.require_api_key()?)
                .query(&PageQuery {
                    page_size: LIST_PAGE_SIZE,
                    page_token: page_token.as_deref(),
                })
                .send()?;

            let page: ModelPage = check_blocking(Provider::Google, response)?.json()?;
            match absorb_page(page, &mut names) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }
}

/// Async Gemini client
#[derive(Debug, Clone)]
pub struct AsyncGoogleClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AsyncGoogleClient {
    /// Create a client from explicit settings
    pub fn new(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self {
            http: async_client(&config)?,
            config,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> TokemonResult<Self> {
        Self::new(ClientConfig::from_env(Provider::Google))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Count the total tokens of a single user content
    pub async fn count_tokens(&self, model: &str, text: &str) -> TokemonResult<usize> {
        tracing::debug!(model, chars = text.len(), "google countTokens");

        let response = self
            .http
            .post(count_url(&self.config, model))
            .header("x-goog-api-key", self.config.require_api_key()?)
            .json(&count_body(text))
            .send()
            .await?;

        let count: CountTokensResponse = check_async(Provider::Google, response)
            .await?
            .json()
            .await?;
        Ok(count.total_tokens)
    }

    /// List raw model resource names (`models/...`), following pagination
    pub async fn list_models(&self) -> TokemonResult<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            tracing::debug!(page_token = ?page_token, "google list models");
            let response = self
                .http
                .get(self.config.url(MODELS_PATH))
                .header("x-goog-api-key", self.config.require_api_key()?)
                .query(&PageQuery {
                    page_size: LIST_PAGE_SIZE,
                    page_token: page_token.as_deref(),
                })
                .send()
                .await?;

            let page: ModelPage = check_async(Provider::Google, response)
                .await?
                .json()
                .await?;
            match absorb_page(page, &mut names) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }
}
