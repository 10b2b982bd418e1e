//! xAI model listers

use async_trait::async_trait;

use super::{AsyncModelLister, ModelLister};
use crate::api::xai::{AsyncXaiClient, XaiClient};
use crate::cache::{CacheStats, ModelCache, ModelList};
use crate::config::{ClientConfig, ASYNC_MODELS_TTL};
use crate::error::TokemonResult;
use crate::model::Provider;

/// Blocking xAI model lister
#[derive(Debug)]
pub struct XaiModels {
    client: XaiClient,
    cache: ModelCache,
}

impl XaiModels {
    /// Create a lister configured from the environment
    pub fn new() -> TokemonResult<Self> {
        Self::with_config(ClientConfig::from_env(Provider::Xai))
    }

    /// Create a lister from explicit settings
    pub fn with_config(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self::from_client(XaiClient::new(config)?))
    }

    /// Wrap an existing client
    pub fn from_client(client: XaiClient) -> Self {
        let ttl = client.config().models_ttl;
        Self {
            client,
            cache: ModelCache::new(ttl),
        }
    }
}

impl ModelLister for XaiModels {
    fn provider(&self) -> Provider {
        Provider::Xai
    }

    fn models(&self) -> TokemonResult<ModelList> {
        self.cache
            .get_or_try_fetch(|| self.client.list_language_models())
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

/// Async xAI model lister
#[derive(Debug)]
pub struct AsyncXaiModels {
    client: AsyncXaiClient,
    cache: ModelCache,
}

impl AsyncXaiModels {
    /// Create a lister configured from the environment
    pub fn new() -> TokemonResult<Self> {
        Self::with_config(ClientConfig::from_env(Provider::Xai))
    }

    /// Create a lister from explicit settings
    pub fn with_config(config: ClientConfig) -> TokemonResult<Self> {
        Ok(Self::from_client(AsyncXaiClient::new(config)?))
    }

    /// Wrap an existing client
    pub fn from_client(client: AsyncXaiClient) -> Self {
        let ttl = client.config().models_ttl.unwrap_or(ASYNC_MODELS_TTL);
        Self {
            client,
            cache: ModelCache::new(Some(ttl)),
        }
    }
}

#[async_trait]
impl AsyncModelLister for AsyncXaiModels {
    fn provider(&self) -> Provider {
        Provider::Xai
    }

    async fn models(&self) -> TokemonResult<ModelList> {
        if let Some(models) = self.cache.get()? {
            return Ok(models);
        }

        let models = self.client.list_language_models().await?;
        tracing::debug!(count = models.len(), "refreshed xai model list");
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

    fn listing(ids: &[&str]) -> serde_json::Value {
        json!({
            "models": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()
        })
    }

    fn config(uri: &str) -> ClientConfig {
        ClientConfig::new(Provider::Xai)
            .with_api_key("xai-test")
            .with_base_url(uri)
    }

    #[test]
    fn test_sync_models_keep_first_snapshot() {
        let vendor = MockVendor::start();
        vendor.mount(
            Mock::given(method("GET"))
                .and(path("/v1/language-models"))
                .respond_with(ModelSequence::new(vec![
                    listing(&["grok-3", "grok-3-mini"]),
                    listing(&["grok-4-0709"]),
                ])),
        );

        let lister = XaiModels::with_config(config(&vendor.uri())).unwrap();
        let first = lister.models().unwrap();
        let second = lister.models().unwrap();

        assert_eq!(&*first, &["grok-3".to_string(), "grok-3-mini".to_string()]);
        assert_eq!(first, second);
        assert_eq!(vendor.received(), 1);
    }

    #[test]
    fn test_sync_models_with_ttl_refresh() {
        let vendor = MockVendor::start();
        vendor.mount(
            Mock::given(method("GET"))
                .and(path("/v1/language-models"))
                .respond_with(ModelSequence::new(vec![
                    listing(&["grok-3"]),
                    listing(&["grok-4-0709"]),
                ])),
        );

        let lister = XaiModels::with_config(
            config(&vendor.uri()).with_models_ttl(std::time::Duration::ZERO),
        )
        .unwrap();

        assert_eq!(&*lister.models().unwrap(), &["grok-3".to_string()]);
        assert_eq!(&*lister.models().unwrap(), &["grok-4-0709".to_string()]);
    }

    #[tokio::test]
    async fn test_async_models() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/language-models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing(&["grok-3", "grok-3-mini"])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let lister = AsyncXaiModels::with_config(config(&mock_server.uri())).unwrap();

        assert_eq!(lister.provider(), Provider::Xai);
        assert_eq!(lister.models().await.unwrap().len(), 2);
        assert_eq!(lister.models().await.unwrap().len(), 2);
        assert_eq!(lister.cache_stats().hits, 1);
    }

    #[test]
    fn test_default_ttls() {
        let unused = "http://127.0.0.1:9";
        let ten = std::time::Duration::from_secs(10);

        assert_eq!(XaiModels::with_config(config(unused)).unwrap().cache.ttl(), None);
        assert_eq!(
            AsyncXaiModels::with_config(config(unused)).unwrap().cache.ttl(),
            Some(ASYNC_MODELS_TTL)
        );
        assert_eq!(ASYNC_MODELS_TTL.as_secs(), 300);

        // an explicit TTL wins in both modes
        let custom = config(unused).with_models_ttl(ten);
        assert_eq!(XaiModels::with_config(custom.clone()).unwrap().cache.ttl(), Some(ten));
        assert_eq!(AsyncXaiModels::with_config(custom).unwrap().cache.ttl(), Some(ten));
    }
}
