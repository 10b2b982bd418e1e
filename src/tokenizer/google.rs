//! Google Gemini tokenizer implementation

use std::sync::Arc;

use async_trait::async_trait;

use super::{ensure_supported, AsyncTokenizer, ModelValidation, Tokenizer};
use crate::api::google::{AsyncGoogleClient, GoogleClient};
use crate::config::ClientConfig;
use crate::error::TokemonResult;
use crate::model::{Provider, TokenizerResponse};
use crate::provider::{AsyncGoogleModels, AsyncModelLister, GoogleModels, ModelLister};
use crate::registry;

/// Gemini tokenizer implementation
///
/// The model name is the bare id (`gemini-2.5-flash`), without the
/// `models/` resource prefix.
pub struct GoogleAITokenizer {
    model: String,
    client: GoogleClient,
}

impl GoogleAITokenizer {
    /// Create a tokenizer configured from the environment
    pub fn new(model: &str) -> TokemonResult<Self> {
        let lister = registry::model_lister(Provider::Google)?;
        Self::with_lister(model, GoogleClient::from_env()?, lister.as_ref())
    }

    /// Create a tokenizer from explicit settings
    pub fn with_config(model: &str, config: ClientConfig) -> TokemonResult<Self> {
        let client = GoogleClient::new(config)?;
        let lister = GoogleModels::from_client(client.clone());
        Self::with_lister(model, client, &lister)
    }

    /// Create a tokenizer validated against the given lister
    pub fn with_lister(
        model: &str,
        client: GoogleClient,
        lister: &dyn ModelLister,
    ) -> TokemonResult<Self> {
        ensure_supported(Provider::Google, model, &lister.models()?)?;

        Ok(Self {
            model: model.to_string(),
            client,
        })
    }
}

impl Tokenizer for GoogleAITokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        let tokens = self.client.count_tokens(&self.model, text)?;
        Ok(TokenizerResponse::new(tokens, &self.model, Provider::Google))
    }
}

/// Async Gemini tokenizer implementation
pub struct AsyncGoogleAITokenizer {
    model: String,
    client: AsyncGoogleClient,
    validation: ModelValidation,
}

impl AsyncGoogleAITokenizer {
    /// Create a tokenizer configured from the environment
    pub fn new(model: &str) -> TokemonResult<Self> {
        let lister = registry::async_model_lister(Provider::Google)?;
        Ok(Self::with_lister(model, AsyncGoogleClient::from_env()?, lister))
    }

    /// Create a tokenizer from explicit settings
    pub fn with_config(model: &str, config: ClientConfig) -> TokemonResult<Self> {
        let client = AsyncGoogleClient::new(config)?;
        let lister = Arc::new(AsyncGoogleModels::from_client(client.clone()));
        Ok(Self::with_lister(model, client, lister))
    }

    /// Create a tokenizer checked against the given lister on first use
    pub fn with_lister(
        model: &str,
        client: AsyncGoogleClient,
        lister: Arc<dyn AsyncModelLister>,
    ) -> Self {
        Self {
            model: model.to_string(),
            client,
            validation: ModelValidation::new(lister),
        }
    }

    /// Check the model against the provider's current model list
    pub async fn ensure_supported(&self) -> TokemonResult<()> {
        self.validation.ensure(&self.model).await
    }
}

#[async_trait]
impl AsyncTokenizer for AsyncGoogleAITokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        self.ensure_supported().await?;
        let tokens = self.client.count_tokens(&self.model, text).await?;
        Ok(TokenizerResponse::new(tokens, &self.model, Provider::Google))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokemonError;
    use crate::tests::MockVendor;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn models_mock() -> Mock {
        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    {"name": "models/gemini-2.5-pro"},
                    {"name": "models/gemini-2.5-flash"}
                ]
            })))
    }

    fn config(uri: &str) -> ClientConfig {
        ClientConfig::new(Provider::Google)
            .with_api_key("test-key")
            .with_base_url(uri)
    }

    #[test]
    fn test_gemini_tokenizer() {
        let vendor = MockVendor::start();
        vendor.mount(models_mock());
        vendor.mount(
            Mock::given(method("POST"))
                .and(path("/v1beta/models/gemini-2.5-flash:countTokens"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "totalTokens": 6
                }))),
        );

        let tokenizer =
            GoogleAITokenizer::with_config("gemini-2.5-flash", config(&vendor.uri())).unwrap();
        let response = tokenizer.count_tokens("Hello, Gemini!").unwrap();

        assert_eq!(response.input_tokens, Some(6));
        assert_eq!(response.model, "gemini-2.5-flash");
        assert_eq!(response.provider, Provider::Google);
    }

    #[test]
    fn test_gemini_tokenizer_empty_text() {
        let vendor = MockVendor::start();
        vendor.mount(models_mock());
        vendor.mount(
            Mock::given(method("POST"))
                .and(path("/v1beta/models/gemini-2.5-pro:countTokens"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({}))),
        );

        let tokenizer =
            GoogleAITokenizer::with_config("gemini-2.5-pro", config(&vendor.uri())).unwrap();

        assert_eq!(tokenizer.count_tokens("").unwrap().input_tokens, Some(0));
    }

    #[test]
    fn test_gemini_tokenizer_rejects_prefixed_name() {
        let vendor = MockVendor::start();
        vendor.mount(models_mock());

        let result = GoogleAITokenizer::with_config("models/gemini-2.5-pro", config(&vendor.uri()));

        assert!(matches!(result, Err(TokemonError::UnsupportedModel(_))));
    }

    #[tokio::test]
    async fn test_async_gemini_tokenizer() {
        let mock_server = MockServer::start().await;
        models_mock().expect(1).mount(&mock_server).await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-pro:countTokens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalTokens": 3
            })))
            .mount(&mock_server)
            .await;

        let tokenizer =
            AsyncGoogleAITokenizer::with_config("gemini-2.5-pro", config(&mock_server.uri()))
                .unwrap();
        let response = tokenizer.count_tokens("Hi there").await.unwrap();

        assert_eq!(response.input_tokens, Some(3));
        assert_eq!(response.provider, Provider::Google);
        assert_eq!(tokenizer.provider(), Provider::Google);
        assert_eq!(tokenizer.model(), "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_async_gemini_tokenizer_unsupported_model() {
        let mock_server = MockServer::start().await;
        models_mock().mount(&mock_server).await;

        let tokenizer =
            AsyncGoogleAITokenizer::with_config("gemini-1.0-ultra", config(&mock_server.uri()))
                .unwrap();

        assert!(matches!(
            tokenizer.count_tokens("Hi").await,
            Err(TokemonError::UnsupportedModel(ref name)) if name == "gemini-1.0-ultra"
        ));
    }
}
