//! Google model listers

use async_trait::async_trait;

use super::{AsyncModelLister, ModelLister};
use crate::api::google::{AsyncGoogleClient, GoogleClient};
use crate::cache::{CacheStats, ModelCache, ModelList};
use crate::config::{ClientConfig, ASYNC_MODELS_TTL};
use crate::error::TokemonResult;
use crate::model::Provider;

/// Resource prefix the Gemini API puts in front of model names
const MODELS_PREFIX: &str = "models/";

/// Strip the `models/` resource prefix from a Gemini model name
pub fn strip_models_prefix(name: &str) -> &str {
    name.strip_prefix(MODELS_PREFIX).unwrap_or(name)
}

fn model_ids(names: Vec<String>) -> Vec<String> {
    names
        .iter()
        .map(|name| strip_models_prefix(name).to_string())
        .collect()
}

/// Blocking Google model lister
#[derive(Debug)]
pub struct GoogleModels {
    client: GoogleClient,
    cache: ModelCache,
}

impl GoogleModels {
    /// Create a lister configured from the environment
    pub fn new() -> TokemonResult<Self> {
        Self::with_config(ClientConfig::from_env(Provider::Google))
    }

    /// Create a lister from explicit settings
    pub fn with_config(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self::from_client(GoogleClient::new(config)?))
    }

    /// Wrap an existing client
    pub fn from_client(client: GoogleClient) -> Self {
        let ttl = client.config().models_ttl;
        Self {
            client,
            cache: ModelCache::new(ttl),
        }
    }
}

impl ModelLister for GoogleModels {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn models(&self) -> TokemonResult<ModelList> {
        self.cache
            .get_or_try_fetch(|| self.client.list_models().map(model_ids))
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

/// Async Google model lister
#[derive(Debug)]
pub struct AsyncGoogleModels {
    client: AsyncGoogleClient,
    cache: ModelCache,
}

impl AsyncGoogleModels {
    /// Create a lister configured from the environment
    pub fn new() -> TokemonResult<Self> {
        Self::with_config(ClientConfig::from_env(Provider::Google))
    }

    /// Create a lister from explicit settings
    pub fn with_config(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self::from_client(AsyncGoogleClient::new(config)?))
    }

    /// Wrap an existing client
    pub fn from_client(client: AsyncGoogleClient) -> Self {
        let ttl = client.config().models_ttl.unwrap_or(ASYNC_MODELS_TTL);
        Self {
            client,
            cache: ModelCache::new(Some(ttl)),
        }
    }
}

#[async_trait]
impl AsyncModelLister for AsyncGoogleModels {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn models(&self) -> TokemonResult<ModelList> {
        if let Some(models) = self.cache.get()? {
            return Ok(models);
        }

        let models = model_ids(self.client.list_models().await?);
        tracing::debug!(count = models.len(), "refreshed google model list");
        self.cache.store(models)
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MockVendor, ModelSequence};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(names: &[&str]) -> serde_json::Value {
        json!({
            "models": names.iter().map(|name| json!({"name": name})).collect::<Vec<_>>()
        })
    }

    fn config(uri: &str) -> ClientConfig {
        ClientConfig::new(Provider::Google)
            .with_api_key("test-key")
            .with_base_url(uri)
    }

    #[test]
    fn test_strip_models_prefix() {
        assert_eq!(strip_models_prefix("models/gemini-2.5-pro"), "gemini-2.5-pro");
        assert_eq!(strip_models_prefix("gemini-2.5-pro"), "gemini-2.5-pro");
        assert_eq!(strip_models_prefix(""), "");
        assert_eq!(strip_models_prefix("models/"), "");
        assert_eq!(
            strip_models_prefix("tunedModels/models/x"),
            "tunedModels/models/x"
        );
    }

    #[test]
    fn test_strip_models_prefix_idempotent() {
        let once = strip_models_prefix("models/gemini-2.0-flash");
        assert_eq!(strip_models_prefix(once), once);
    }

    #[test]
    fn test_sync_models_strip_prefix() {
        let vendor = MockVendor::start();
        vendor.mount(
            Mock::given(method("GET"))
                .and(path("/v1beta/models"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(page(&["models/gemini-2.5-pro", "models/gemini-2.0-flash"])),
                ),
        );

        let lister = GoogleModels::with_config(config(&vendor.uri())).unwrap();

        assert_eq!(
            &*lister.models().unwrap(),
            &["gemini-2.5-pro".to_string(), "gemini-2.0-flash".to_string()]
        );
    }

    #[test]
    fn test_sync_models_keep_first_snapshot() {
        let vendor = MockVendor::start();
        vendor.mount(
            Mock::given(method("GET"))
                .and(path("/v1beta/models"))
                .respond_with(ModelSequence::new(vec![
                    page(&["models/gemini-2.5-pro"]),
                    page(&["models/gemini-3-pro-preview"]),
                ])),
        );

        let lister = GoogleModels::with_config(config(&vendor.uri())).unwrap();
        lister.models().unwrap();

        assert_eq!(&*lister.models().unwrap(), &["gemini-2.5-pro".to_string()]);
        assert_eq!(vendor.received(), 1);
    }

    #[tokio::test]
    async fn test_async_models_mixed_prefixes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page(&["models/gemini-2.5-flash", "gemini-2.0-flash-lite"])),
            )
            .mount(&mock_server)
            .await;

        let lister = AsyncGoogleModels::with_config(config(&mock_server.uri())).unwrap();

        assert_eq!(
            &*lister.models().await.unwrap(),
            &["gemini-2.5-flash".to_string(), "gemini-2.0-flash-lite".to_string()]
        );
    }

    #[test]
    fn test_default_ttls() {
        let unused = "http://127.0.0.1:9";
        let ten = std::time::Duration::from_secs(10);

        assert_eq!(GoogleModels::with_config(config(unused)).unwrap().cache.ttl(), None);
        assert_eq!(
            AsyncGoogleModels::with_config(config(unused)).unwrap().cache.ttl(),
            Some(ASYNC_MODELS_TTL)
        );
        assert_eq!(ASYNC_MODELS_TTL.as_secs(), 300);

        // an explicit TTL wins in both modes
        let custom = config(unused).with_models_ttl(ten);
        assert_eq!(GoogleModels::with_config(custom.clone()).unwrap().cache.ttl(), Some(ten));
        assert_eq!(AsyncGoogleModels::with_config(custom).unwrap().cache.ttl(), Some(ten));
    }
}
