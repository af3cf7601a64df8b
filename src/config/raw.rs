//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults, so an
//! empty file (or no file at all) resolves to the built-in configuration.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

use crate::chat::{self, Source};

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape, serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub llm: RawLlm,
    #[serde(default)]
    pub chat: RawChat,
}

// ── Server ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// ── LLM ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            openai: RawOpenAiConfig::default(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

// ── Chat ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawChat {
    #[serde(default)]
    pub prompt_file: Option<String>,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    #[serde(default = "chat::default_sources")]
    pub sources: Vec<Source>,
}

impl Default for RawChat {
    fn default() -> Self {
        Self {
            prompt_file: None,
            fallback_message: default_fallback_message(),
            sources: chat::default_sources(),
        }
    }
}

// ── Default functions (used by serde) ────────────────────────────────────────

fn default_name() -> String {
    "BallotBuddy".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_llm_provider() -> String {
    "openai".to_string()
}
fn default_openai_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_openai_temperature() -> f32 {
    0.3
}
fn default_openai_timeout_seconds() -> u64 {
    60
}

fn default_fallback_message() -> String {
    chat::DEFAULT_FALLBACK_MESSAGE.to_string()
}
