//! OpenAI model to BPE encoding table

use once_cell::sync::OnceCell;
use strum::{Display, EnumString};
use tiktoken_rs::{CoreBPE, ENDOFPROMPT, ENDOFTEXT, FIM_MIDDLE, FIM_PREFIX, FIM_SUFFIX};

use crate::error::{TokemonError, TokemonResult};

/// BPE encodings used by OpenAI models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum OpenAIEncoding {
    O200kBase,
    Cl100kBase,
    P50kBase,
    P50kEdit,
    R50kBase,
}

/// Known OpenAI models and their encodings, in catalogue order
pub const MODEL_TO_ENCODING: &[(&str, OpenAIEncoding)] = &[
    // reasoning
    ("o1", OpenAIEncoding::O200kBase),
    ("o3", OpenAIEncoding::O200kBase),
    ("o4-mini", OpenAIEncoding::O200kBase),
    // chat
    ("gpt-5", OpenAIEncoding::O200kBase),
    ("gpt-4.1", OpenAIEncoding::O200kBase),
    ("gpt-4o", OpenAIEncoding::O200kBase),
    ("gpt-4", OpenAIEncoding::Cl100kBase),
    ("gpt-3.5-turbo", OpenAIEncoding::Cl100kBase),
    ("gpt-3.5", OpenAIEncoding::Cl100kBase),
    ("gpt-35-turbo", OpenAIEncoding::Cl100kBase),
    // base
    ("davinci-002", OpenAIEncoding::Cl100kBase),
    ("babbage-002", OpenAIEncoding::Cl100kBase),
    // embeddings
    ("text-embedding-ada-002", OpenAIEncoding::Cl100kBase),
    ("text-embedding-3-small", OpenAIEncoding::Cl100kBase),
    ("text-embedding-3-large", OpenAIEncoding::Cl100kBase),
    // DEPRECATED MODELS
    // text (DEPRECATED)
    ("text-davinci-003", OpenAIEncoding::P50kBase),
    ("text-davinci-002", OpenAIEncoding::P50kBase),
    ("text-davinci-001", OpenAIEncoding::R50kBase),
    ("text-curie-001", OpenAIEncoding::R50kBase),
    ("text-babbage-001", OpenAIEncoding::R50kBase),
    ("text-ada-001", OpenAIEncoding::R50kBase),
    ("davinci", OpenAIEncoding::R50kBase),
    ("curie", OpenAIEncoding::R50kBase),
    ("babbage", OpenAIEncoding::R50kBase),
    ("ada", OpenAIEncoding::R50kBase),
    // code (DEPRECATED)
    ("code-davinci-002", OpenAIEncoding::P50kBase),
    ("code-davinci-001", OpenAIEncoding::P50kBase),
    ("code-cushman-002", OpenAIEncoding::P50kBase),
    ("code-cushman-001", OpenAIEncoding::P50kBase),
    ("davinci-codex", OpenAIEncoding::P50kBase),
    ("cushman-codex", OpenAIEncoding::P50kBase),
    // edit (DEPRECATED)
    ("text-davinci-edit-001", OpenAIEncoding::P50kEdit),
    ("code-davinci-edit-001", OpenAIEncoding::P50kEdit),
    // old embeddings (DEPRECATED)
    ("text-similarity-davinci-001", OpenAIEncoding::R50kBase),
    ("text-similarity-curie-001", OpenAIEncoding::R50kBase),
    ("text-similarity-babbage-001", OpenAIEncoding::R50kBase),
    ("text-similarity-ada-001", OpenAIEncoding::R50kBase),
    ("text-search-davinci-doc-001", OpenAIEncoding::R50kBase),
    ("text-search-curie-doc-001", OpenAIEncoding::R50kBase),
    ("text-search-babbage-doc-001", OpenAIEncoding::R50kBase),
    ("text-search-ada-doc-001", OpenAIEncoding::R50kBase),
    ("code-search-babbage-code-001", OpenAIEncoding::R50kBase),
    ("code-search-ada-code-001", OpenAIEncoding::R50kBase),
    // open source (gpt2 shares the r50k_base ranks)
    ("gpt2", OpenAIEncoding::R50kBase),
    ("gpt-2", OpenAIEncoding::R50kBase),
];

impl OpenAIEncoding {
    /// Resolve the encoding for an exact model name
    pub fn for_model(model: &str) -> Option<Self> {
        MODEL_TO_ENCODING
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, encoding)| *encoding)
    }

    /// Shared BPE ranks for this encoding, loaded on first use
    pub fn bpe(&self) -> TokemonResult<&'static CoreBPE> {
        static O200K_BASE: OnceCell<CoreBPE> = OnceCell::new();
        static CL100K_BASE: OnceCell<CoreBPE> = OnceCell::new();
        static P50K_BASE: OnceCell<CoreBPE> = OnceCell::new();
        static P50K_EDIT: OnceCell<CoreBPE> = OnceCell::new();
        static R50K_BASE: OnceCell<CoreBPE> = OnceCell::new();

        let cell = match self {
            OpenAIEncoding::O200kBase => &O200K_BASE,
            OpenAIEncoding::Cl100kBase => &CL100K_BASE,
            OpenAIEncoding::P50kBase => &P50K_BASE,
            OpenAIEncoding::P50kEdit => &P50K_EDIT,
            OpenAIEncoding::R50kBase => &R50K_BASE,
        };

        cell.get_or_try_init(|| {
            tracing::debug!(encoding = %self, "loading BPE ranks");
            let bpe = match self {
                OpenAIEncoding::O200kBase => tiktoken_rs::o200k_base(),
                OpenAIEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
                OpenAIEncoding::P50kBase => tiktoken_rs::p50k_base(),
                OpenAIEncoding::P50kEdit => tiktoken_rs::p50k_edit(),
                OpenAIEncoding::R50kBase => tiktoken_rs::r50k_base(),
            };

            bpe.map_err(|e| TokemonError::TokenizerError(e.to_string()))
        })
    }

    /// Control-token strings this encoding reserves
    pub fn special_tokens(&self) -> &'static [&'static str] {
        match self {
            OpenAIEncoding::O200kBase => &[ENDOFTEXT, ENDOFPROMPT],
            OpenAIEncoding::Cl100kBase => {
                &[ENDOFTEXT, FIM_PREFIX, FIM_MIDDLE, FIM_SUFFIX, ENDOFPROMPT]
            }
            OpenAIEncoding::P50kEdit => &[ENDOFTEXT, FIM_PREFIX, FIM_MIDDLE, FIM_SUFFIX],
            OpenAIEncoding::P50kBase | OpenAIEncoding::R50kBase => &[ENDOFTEXT],
        }
    }

    /// First reserved control-token string found in `text`
    pub fn find_special_token(&self, text: &str) -> Option<&'static str> {
        self.special_tokens()
            .iter()
            .copied()
            .find(|token| text.contains(token))
    }
}

/// Names of every model in the table
pub fn model_names() -> Vec<String> {
    MODEL_TO_ENCODING
        .iter()
        .map(|(name, _)| name.to_string())
        .collect()
}
