//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! then applies `PORT`, `OPENAI_MODEL` and `BALLOTBUDDY_LOG_LEVEL`
//! overrides. The API key only ever comes from the environment.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;

use super::raw::RawConfig;
use super::types::*;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Values taken from the process environment after the TOML is merged.
///
/// Tests build this directly instead of mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub model: Option<String>,
    pub log_level: Option<String>,
    pub api_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT").ok(),
            model: env::var("OPENAI_MODEL").ok(),
            log_level: env::var("BALLOTBUDDY_LOG_LEVEL").ok(),
            api_key: env::var("OPENAI_API_KEY")
                .ok()
                .or_else(|| env::var("LLM_API_KEY").ok())
                .filter(|k| !k.trim().is_empty()),
        }
    }
}

/// Deep-merge two TOML values.
/// Tables are merged recursively; the overlay only needs to specify keys that
/// differ from the base. For every other type (string, integer, array, …)
/// the overlay value replaces the base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = if Path::new(base_str).is_absolute() {
            PathBuf::from(base_str)
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_str)
        };
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

/// Load config from `config_path`, or `config/default.toml` when it exists,
/// or the built-in defaults, then apply `overrides`.
pub fn load(config_path: Option<&str>, overrides: &EnvOverrides) -> Result<Config, AppError> {
    if let Some(path) = config_path {
        return load_from(Path::new(path), overrides);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_from(default_path, overrides)
    } else {
        resolve(RawConfig::default(), overrides)
    }
}

/// Load a specific file (following its base chain) and apply `overrides`.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let merged_val = load_raw_merged(path, &mut HashSet::new())?;

    let parsed: RawConfig = Deserialize::deserialize(merged_val).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    resolve(parsed, overrides)
}

/// Apply overrides, validate, and convert raw values to public types.
fn resolve(parsed: RawConfig, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let s = parsed.server;

    let port = match overrides.port.as_deref() {
        Some(p) => p
            .trim()
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("invalid PORT '{p}': {e}")))?,
        None => s.port,
    };

    let log_level = overrides.log_level.clone().unwrap_or(s.log_level);
    logger::parse_level(&log_level).map_err(|e| AppError::Config(e.to_string()))?;

    let o = parsed.llm.openai;
    let model = overrides.model.clone().unwrap_or(o.model);
    if model.trim().is_empty() {
        return Err(AppError::Config("llm.openai.model must not be empty".into()));
    }
    if !(0.0..=2.0).contains(&o.temperature) {
        return Err(AppError::Config(format!(
            "llm.openai.temperature must be within 0.0..=2.0, got {}",
            o.temperature
        )));
    }
    if o.timeout_seconds == 0 {
        return Err(AppError::Config("llm.openai.timeout_seconds must be > 0".into()));
    }

    let chat = parsed.chat;
    if chat.fallback_message.trim().is_empty() {
        return Err(AppError::Config("chat.fallback_message must not be empty".into()));
    }
    // An empty list would make a real answer indistinguishable from the fallback.
    if chat.sources.is_empty() {
        return Err(AppError::Config("chat.sources must list at least one source".into()));
    }

    Ok(Config {
        server: ServerConfig {
            name: s.name,
            log_level,
            host: s.host,
            port,
            max_upload_bytes: s.max_upload_bytes,
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: o.api_base_url,
                model,
                temperature: o.temperature,
                timeout_seconds: o.timeout_seconds,
            },
        },
        chat: ChatConfig {
            prompt_file: chat.prompt_file.map(PathBuf::from),
            fallback_message: chat.fallback_message,
            sources: chat.sources,
        },
        llm_api_key: overrides.api_key.clone(),
    })
}
