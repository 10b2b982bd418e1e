//! xAI API client

use serde::Deserialize;
use serde_json::json;

use super::{async_client, blocking_client, check_async, check_blocking};
use crate::config::ClientConfig;
use crate::error::TokemonResult;
use crate::model::Provider;

const TOKENIZE_PATH: &str = "/v1/tokenize-text";
const MODELS_PATH: &str = "/v1/language-models";

/// One token produced by the xAI tokenizer
#[derive(Debug, Clone, Deserialize)]
pub struct XaiToken {
    pub token_id: u64,
    #[serde(default)]
    pub string_token: Option<String>,
}

#[derive(Deserialize)]
struct TokenizeResponse {
    #[serde(default)]
    token_ids: Vec<XaiToken>,
}

#[derive(Deserialize)]
struct LanguageModel {
    id: String,
}

#[derive(Deserialize)]
struct LanguageModels {
    #[serde(default)]
    models: Vec<LanguageModel>,
}

fn tokenize_body(model: &str, text: &str) -> serde_json::Value {
    json!({
        "text": text,
        "model": model
    })
}

/// Blocking xAI client
#[derive(Debug, Clone)]
pub struct XaiClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
}

impl XaiClient {
    /// Create a client from explicit settings
    pub fn new(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self {
            http: blocking_client(&config)?,
            config,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> TokemonResult<Self> {
        Self::new(ClientConfig::from_env(Provider::Xai))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Tokenize a text with the model's tokenizer
    pub fn tokenize(&self, model: &str, text: &str) -> TokemonResult<Vec<XaiToken>> {
        tracing::debug!(model, chars = text.len(), "xai tokenize-text");

        let response = self
            .http
            .post(self.config.url(TOKENIZE_PATH))
            .bearer_auth(self.config.require_api_key()?)
            .json(&tokenize_body(model, text))
            .send()?;

        let tokens: TokenizeResponse = check_blocking(Provider::Xai, response)?.json()?;
        Ok(tokens.token_ids)
    }

    /// List language model names
    pub fn list_language_models(&self) -> TokemonResult<Vec<String>> {
        tracing::debug!("xai list language-models");

        let response = self
            .http
            .get(self.config.url(MODELS_PATH))
            .bearer_auth(self.config.require_api_key()?)
            .send()?;

        let models: LanguageModels = check_blocking(Provider::Xai, response)?.json()?;
        Ok(models.models.into_iter().map(|model| model.id).collect())
    }
}

/// Async xAI client
#[derive(Debug, Clone)]
pub struct AsyncXaiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AsyncXaiClient {
    /// Create a client from explicit settings
    pub fn new(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self {
            http: async_client(&config)?,
            config,
        })
    }

    /// Create a client configured from the environment
    pub fn from_env() -> TokemonResult<Self> {
        Self::new(ClientConfig::from_env(Provider::Xai))
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Tokenize a text with the model's tokenizer
    pub async fn tokenize(&self, model: &str, text: &str) -> TokemonResult<Vec<XaiToken>> {
        tracing::debug!(model, chars = text.len(), "xai tokenize-text");

        let response = self
            .http
            .post(self.config.url(TOKENIZE_PATH))
            .bearer_auth(self.config.require_api_key()?)
            .json(&tokenize_body(model, text))
            .send()
            .await?;

        let tokens: TokenizeResponse = check_async(Provider::Xai, response)
            .await?
            .json()
            .await?;
        Ok(tokens.token_ids)
    }

    /// List language model names
    pub async fn list_language_models(&self) -> TokemonResult<Vec<String>> {
        tracing::debug!("xai list language-models");

        let response = self
            .http
            .get(self.config.url(MODELS_PATH))
            .bearer_auth(self.config.require_api_key()?)
            .send()
            .await?;

        let models: LanguageModels = check_async(Provider::Xai, response)
            .await?
            .json()
            .await?;
        Ok(models.models.into_iter().map(|model| model.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokemonError;
    use crate::tests::MockVendor;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(uri: &str) -> ClientConfig {
        ClientConfig::new(Provider::Xai)
            .with_api_key("xai-test")
            .with_base_url(uri)
    }

    #[test]
    fn test_tokenize_request_shape() {
        let vendor = MockVendor::start();
        vendor.mount(
            Mock::given(method("POST"))
                .and(path("/v1/tokenize-text"))
                .and(header("authorization", "Bearer xai-test"))
                .and(body_json(json!({"text": "Hello, Grok!", "model": "grok-3"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "token_ids": [
                        {"token_id": 9707, "string_token": "Hello", "token_bytes": [72, 101, 108, 108, 111]},
                        {"token_id": 11, "string_token": ",", "token_bytes": [44]},
                        {"token_id": 480, "string_token": " Grok", "token_bytes": [32, 71, 114, 111, 107]},
                        {"token_id": 0, "string_token": "!", "token_bytes": [33]}
                    ]
                })))
                .expect(1),
        );

        let client = XaiClient::new(config(&vendor.uri())).unwrap();
        let tokens = client.tokenize("grok-3", "Hello, Grok!").unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].token_id, 9707);
        assert_eq!(tokens[2].string_token.as_deref(), Some(" Grok"));
    }

    #[test]
    fn test_list_language_models() {
        let vendor = MockVendor::start();
        vendor.mount(
            Mock::given(method("GET"))
                .and(path("/v1/language-models"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "models": [{"id": "grok-3"}, {"id": "grok-3-mini"}]
                }))),
        );

        let client = XaiClient::new(config(&vendor.uri())).unwrap();
        assert_eq!(
            client.list_language_models().unwrap(),
            vec!["grok-3", "grok-3-mini"]
        );
    }

    #[tokio::test]
    async fn test_async_server_error_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/tokenize-text"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AsyncXaiClient::new(config(&mock_server.uri())).unwrap();
        let err = client.tokenize("grok-3", "hi").await.unwrap_err();

        assert!(matches!(
            err,
            TokemonError::ApiError { status: 503, ref body, .. } if body == "overloaded"
        ));
    }
}
