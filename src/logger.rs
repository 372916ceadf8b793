//! Logging setup.
//!
//! The library logs through the `log` facade. This module installs a `fern`
//! dispatcher that writes timestamped lines to a log file, once per process.

use anyhow::{Context, Result};
use chrono::Local;
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

use crate::config::LoggingConfig;
use crate::constants::LOG_TIMESTAMP_FORMAT;

static LOG_FILE: OnceCell<PathBuf> = OnceCell::new();

/// Parse a log level name (case-insensitive, surrounding whitespace ignored)
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        other => anyhow::bail!("unsupported log level '{}'; expected trace|debug|info|warn|error|off", other),
    }
}

/// Initialize file logging from configuration.
///
/// Returns the active log file, or `None` when logging is disabled. Calling
/// this again after a successful init is a no-op that returns the file
/// chosen the first time.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }
    let level = parse_level(&config.level)?;
    if let Some(path) = LOG_FILE.get() {
        return Ok(Some(path.clone()));
    }

    let path = config
        .log_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine log file location"))?;

    let path = LOG_FILE.get_or_try_init(|| -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}] {:<5} {}: {}",
                    Local::now().format(LOG_TIMESTAMP_FORMAT),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(level)
            // Connection pool chatter drowns out our own lines
            .level_for("sqlx", LevelFilter::Warn)
            .level_for("sea_orm", LevelFilter::Warn)
            .chain(
                fern::log_file(&path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?,
            )
            .apply()
            .context("A global logger is already installed")?;

        info!("Logging to {} at level {}", path.display(), level);
        Ok(path)
    })?;

    Ok(Some(path.clone()))
}

/// Active log file, if logging was initialized
pub fn log_file() -> Option<PathBuf> {
    LOG_FILE.get().cloned()
}
