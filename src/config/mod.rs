//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or a path given with `-f`), then applies environment overrides.
//!
//! # Module layout
//!
//! - **types**: public resolved structs (`Config`, `ServerConfig`, …).
//! - **raw**: TOML deserialization shapes with serde defaults; private.
//! - **load**: `[meta] base` merging, env overrides, validation.

mod load;
mod raw;
mod types;

pub use load::{load, load_from, EnvOverrides, DEFAULT_CONFIG_PATH};
pub use types::*;
