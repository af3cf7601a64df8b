//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory, called once at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod openai_compatible;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from the environment (never TOML). A missing key is
/// not an error here: the first request goes out unauthenticated, fails, and
/// the chat service answers with its fallback.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider::echo())),
        "openai" | "openai-compatible" => {
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        other => Err(ProviderError::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.into(),
            openai: OpenAiConfig {
                api_base_url: "http://127.0.0.1:9/v1/chat/completions".into(),
                model: "gpt-4.1-mini".into(),
                temperature: 0.3,
                timeout_seconds: 5,
            },
        }
    }

    #[test]
    fn builds_dummy() {
        let p = build(&llm_config("dummy"), None).unwrap();
        assert_eq!(p.name(), "dummy");
    }

    #[test]
    fn builds_openai_without_key() {
        let p = build(&llm_config("openai"), None).unwrap();
        assert_eq!(p.name(), "openai");
        assert_eq!(p.model(), "gpt-4.1-mini");
    }

    #[test]
    fn openai_compatible_alias() {
        let p = build(&llm_config("openai-compatible"), Some("sk-test".into())).unwrap();
        assert_eq!(p.name(), "openai");
    }

    #[test]
    fn unknown_provider_rejected() {
        let err = build(&llm_config("gemini"), None).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownProvider(ref n) if n == "gemini"));
    }
}
