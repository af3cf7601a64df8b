//! Public configuration types.
//!
//! These are the resolved, validated structs the rest of the crate consumes.
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

use crate::chat::Source;

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    /// Provider credential, from `OPENAI_API_KEY` / `LLM_API_KEY` only.
    pub llm_api_key: Option<String>,
}

/// HTTP listener settings (`[server]`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Display name used in the startup banner and health endpoint.
    pub name: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
    /// Upper bound on a request body, multipart attachments included.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// `host:port` as passed to `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Highest temperature that still keeps factual answers steady.
pub const MAX_RECOMMENDED_TEMPERATURE: f32 = 0.4;

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

impl OpenAiConfig {
    /// `true` when `temperature` is valid but above
    /// [`MAX_RECOMMENDED_TEMPERATURE`]; startup warns about it.
    pub fn temperature_is_high(&self) -> bool {
        self.temperature > MAX_RECOMMENDED_TEMPERATURE
    }
}

/// LLM provider selection.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"openai"` or `"dummy"`).
    /// Maps to `default` in `[llm]` TOML.
    pub provider: String,
    pub openai: OpenAiConfig,
}

/// Chat behaviour (`[chat]`).
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Replaces the built-in system instruction when set.
    pub prompt_file: Option<PathBuf>,
    /// Answer returned when the provider call fails.
    pub fallback_message: String,
    /// Links attached to every successful answer.
    pub sources: Vec<Source>,
}
