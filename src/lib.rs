/*!
 * tokemon - one interface for input-token counting and model discovery
 *
 * Builds a tokenizer or model lister for OpenAI, Anthropic, xAI or Google
 * from a (provider, mode) pair. OpenAI counts are computed locally with
 * tiktoken; the other providers are asked through their REST APIs.
 */

pub mod api;
pub mod cache;
pub mod config;
pub mod encoding;
pub mod error;
pub mod factory;
pub mod model;
pub mod provider;
pub mod registry;
pub mod report;
pub mod tokenizer;


// Re-export main components for easier access
pub use cache::{CacheStats, ModelList};
pub use config::ClientConfig;
pub use error::{TokemonError, TokemonResult};
pub use factory::{
    build_model_lister, build_model_lister_with, build_tokenizer, build_tokenizer_with, tokemon,
    tokemon_models, AnyModelLister, AnyTokenizer, Backend,
};
pub use model::{Mode, Provider, TokenizerResponse};
pub use provider::{AsyncModelLister, ModelLister};
pub use tokenizer::{AsyncTokenizer, Tokenizer};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
