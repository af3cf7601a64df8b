//! Logging initialisation via tracing-subscriber.
//!
//! The effective filter is chosen in this order:
//!
//! | source                        | example                  |
//! |-------------------------------|--------------------------|
//! | `-v` … `-vvvv` on the CLI     | `-vvv` → `debug`         |
//! | `RUST_LOG`                    | `ballotbuddy=debug,warn` |
//! | `server.log_level` (config)   | `info`                   |
//!
//! A source that fails to parse falls through to the next one. Output goes
//! to stderr; stdout is reserved for the startup banner.

use std::fmt;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where the active filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    Cli,
    Env,
    Config,
}

impl fmt::Display for LevelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LevelSource::Cli => "cli",
            LevelSource::Env => "RUST_LOG",
            LevelSource::Config => "config",
        })
    }
}

/// Map a count of `-v` flags to a level.
///
/// `-v` → warn, `-vv` → info, `-vvv` → debug, `-vvvv` and beyond → trace.
pub fn level_for_verbosity(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Pick the filter for `verbosity`, `rust_log` and `config_level`.
///
/// Pure apart from parsing, so the precedence rules can be tested without
/// touching the process environment.
pub fn resolve_filter(
    config_level: &str,
    verbosity: u8,
    rust_log: Option<&str>,
) -> Result<(EnvFilter, LevelSource), AppError> {
    if let Some(level) = level_for_verbosity(verbosity) {
        if let Ok(filter) = EnvFilter::try_new(level) {
            return Ok((filter, LevelSource::Cli));
        }
    }
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return Ok((filter, LevelSource::Env));
        }
    }
    EnvFilter::try_new(config_level)
        .map(|filter| (filter, LevelSource::Config))
        .map_err(|e| AppError::Logger(format!("invalid log level '{config_level}': {e}")))
}

/// Install the global subscriber once, at startup.
///
/// Returns the source that won so the caller can log it.
pub fn init(config_level: &str, verbosity: u8) -> Result<LevelSource, AppError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, source) = resolve_filter(config_level, verbosity, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(source)
}

/// Parse a log level string into a [`LevelFilter`]. Used to validate
/// `server.log_level` at config load.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
