//! OpenAI tokenizer implementation using tiktoken

use tiktoken_rs::CoreBPE;

use super::{ensure_supported, Tokenizer};
use crate::encoding::OpenAIEncoding;
use crate::error::{TokemonError, TokemonResult};
use crate::model::{Provider, TokenizerResponse};
use crate::provider::ModelLister;
use crate::registry;

/// OpenAI tokenizer implementation
pub struct OpenAITokenizer {
    model: String,
    encoding: OpenAIEncoding,
    bpe: &'static CoreBPE,
}

impl OpenAITokenizer {
    /// Create a new OpenAI tokenizer
    pub fn new(model: &str) -> TokemonResult<Self> {
        Self::with_lister(model, registry::openai_models())
    }

    /// Create a tokenizer validated against the given lister
    pub fn with_lister(model: &str, lister: &dyn ModelLister) -> TokemonResult<Self> {
        ensure_supported(Provider::OpenAI, model, &lister.models()?)?;

        let encoding = OpenAIEncoding::for_model(model)
            .ok_or_else(|| TokemonError::UnsupportedModel(model.to_string()))?;

        Ok(Self {
            model: model.to_string(),
            encoding,
            bpe: encoding.bpe()?,
        })
    }
}

impl Tokenizer for OpenAITokenizer {
    fn model(&self) -> &str {
        &self.model
    }

    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn count_tokens(&self, text: &str) -> TokemonResult<TokenizerResponse> {
        // control tokens are refused rather than encoded as text
        if let Some(token) = self.encoding.find_special_token(text) {
            return Err(TokemonError::TokenizerError(format!(
                "text contains special token {} disallowed by {}",
                token, self.encoding
            )));
        }

        let tokens = self.bpe.encode_ordinary(text);
        Ok(TokenizerResponse::new(tokens.len(), &self.model, Provider::OpenAI))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_tokenizer_basic() {
        let tokenizer = OpenAITokenizer::new("gpt-4").unwrap();
        let response = tokenizer.count_tokens("hello world").unwrap();

        assert_eq!(response.input_tokens, Some(2));
        assert_eq!(response.model, "gpt-4");
        assert_eq!(response.provider, Provider::OpenAI);
    }

    #[test]
    fn test_openai_tokenizer_empty_text() {
        for model in ["gpt-4o", "gpt-4", "text-davinci-003", "davinci", "code-davinci-edit-001"] {
            let tokenizer = OpenAITokenizer::new(model).unwrap();
            assert_eq!(
                tokenizer.count_tokens("").unwrap().input_tokens,
                Some(0),
                "{}",
                model
            );
        }
    }

    #[test]
    fn test_openai_tokenizer_code_content() {
        let code = r#"
                fn main() {
                    println!("Hello, world!");
                }
            "#;

        let tokenizer = OpenAITokenizer::new("gpt-4o").unwrap();
        let response = tokenizer.count_tokens(code).unwrap();
        let expected = tiktoken_rs::o200k_base().unwrap().encode_ordinary(code).len();

        assert_eq!(response.input_tokens, Some(expected));
        assert!(expected > 5);
    }

    #[test]
    fn test_openai_tokenizer_rejects_special_tokens() {
        let tokenizer = OpenAITokenizer::new("gpt-3.5-turbo").unwrap();

        for text in ["<|endoftext|>", "before <|fim_prefix|> after"] {
            let err = tokenizer.count_tokens(text).unwrap_err();
            assert!(matches!(err, TokemonError::TokenizerError(_)), "{}", text);
            assert!(err.to_string().contains("cl100k_base"));
        }

        // lookalikes are plain text
        assert!(tokenizer.count_tokens("<|endoftext").unwrap().input_tokens.unwrap() > 1);
    }

    #[test]
    fn test_openai_tokenizers_share_encoding() {
        let first = OpenAITokenizer::new("gpt-4o").unwrap();
        let second = OpenAITokenizer::new("o1").unwrap();

        assert!(std::ptr::eq(first.bpe, second.bpe));
    }

    #[test]
    fn test_openai_tokenizer_unsupported_model() {
        for model in ["gpt-9", "claude-sonnet-4-5", "", "GPT-4"] {
            assert!(matches!(
                OpenAITokenizer::new(model),
                Err(TokemonError::UnsupportedModel(ref name)) if name == model
            ));
        }
    }
}
