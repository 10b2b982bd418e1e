/*!
 * Integration tests for the public factory entry points
 */

use tokemon::{
    build_tokenizer, build_tokenizer_with, tokemon, tokemon_models, Backend, ClientConfig,
    ModelLister, Mode, Provider, TokemonError, Tokenizer,
};

#[test]
fn test_openai_counts_offline() {
    let tokenizer = tokemon("gpt-3.5-turbo", "openai", "sync").unwrap();
    let tokenizer = tokenizer.as_sync().unwrap();

    let short = tokenizer.count_tokens("hello world").unwrap();
    let long = tokenizer
        .count_tokens("hello world, this sentence is quite a bit longer")
        .unwrap();

    assert_eq!(short.input_tokens, Some(2));
    assert!(long.input_tokens > short.input_tokens);
    assert_eq!(short.model, "gpt-3.5-turbo");
    assert_eq!(short.provider, Provider::OpenAI);
}

#[test]
fn test_default_mode_is_sync() {
    for mode in ["sync", "", "Async", "threaded"] {
        let tokenizer = tokemon("gpt-4o", "openai", mode).unwrap();
        assert_eq!(tokenizer.backend(), Backend::OpenAI, "mode {:?}", mode);
    }
}

#[test]
fn test_unknown_provider_key() {
    let err = tokemon("mistral-large", "mistral", "async").unwrap_err();

    assert!(matches!(err, TokemonError::UnsupportedProvider(ref key) if key == "async-mistral"));
    assert_eq!(err.to_string(), "Unsupported provider: async-mistral");
}

#[test]
fn test_async_openai_rejected() {
    for result in [
        tokemon("gpt-4o", "openai", "async").map(|_| ()),
        build_tokenizer("gpt-4o", Provider::OpenAI, Mode::Async).map(|_| ()),
        build_tokenizer_with("gpt-4o", Mode::Async, ClientConfig::new(Provider::OpenAI)).map(|_| ()),
        tokemon_models("openai", "async").map(|_| ()),
    ] {
        assert!(matches!(
            result,
            Err(TokemonError::UnsupportedProvider(ref key)) if key == "async-openai"
        ));
    }
}

#[test]
fn test_model_listers_for_every_key() {
    for backend in Backend::all() {
        let mode = match backend.mode() {
            Mode::Async => "async",
            Mode::Sync => "sync",
        };
        let lister = tokemon_models(backend.provider().as_str(), mode).unwrap();

        assert_eq!(lister.backend(), backend);
        assert_eq!(lister.backend().key(), backend.key());
    }
}

#[test]
fn test_openai_model_list_is_stable() {
    let lister = tokemon_models("openai", "sync").unwrap();
    let lister = lister.as_sync().unwrap();

    let first = lister.models().unwrap();
    let second = lister.models().unwrap();

    assert_eq!(first, second);
    assert!(first.iter().any(|model| model == "gpt-4"));
    assert!(!first.iter().any(|model| model.starts_with("claude")));
}
