//! OpenAI model lister backed by the local encoding table

use super::ModelLister;
use crate::cache::{CacheStats, ModelCache, ModelList};
use crate::encoding;
use crate::error::TokemonResult;
use crate::model::Provider;

/// OpenAI model lister
///
/// OpenAI counts are computed offline, so the supported models are the
/// ones tiktoken knows an encoding for. There is no async variant.
#[derive(Debug)]
pub struct OpenAIModels {
    cache: ModelCache,
}

impl OpenAIModels {
    /// Create a new lister
    pub fn new() -> Self {
        Self {
            cache: ModelCache::new(None),
        }
    }
}

impl Default for OpenAIModels {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelLister for OpenAIModels {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn models(&self) -> TokemonResult<ModelList> {
        self.cache.get_or_try_fetch(|| Ok(encoding::model_names()))
    }

    fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_models_match_encoding_table() {
        let lister = OpenAIModels::new();
        let models = lister.models().unwrap();

        assert_eq!(lister.provider(), Provider::OpenAI);
        assert_eq!(models.len(), encoding::MODEL_TO_ENCODING.len());
        for name in ["gpt-4o", "gpt-4", "gpt-3.5-turbo", "o1", "gpt2"] {
            assert!(models.iter().any(|model| model == name), "missing {}", name);
        }
    }

    #[test]
    fn test_models_memoized() {
        let lister = OpenAIModels::new();
        let first = lister.models().unwrap();
        let second = lister.models().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(lister.cache_stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_never_expires() {
        assert_eq!(OpenAIModels::new().cache.ttl(), None);
    }
}
