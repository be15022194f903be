//! TOML configuration loader with validation.
//!
//! Loads a [`TeleopConfig`] from disk. Every field carries a default, so a
//! missing table keeps the shipped robot constants; values that are
//! present are bounds-checked by [`TeleopConfig::validate`].

use std::path::Path;

use teleop_common::config::TeleopConfig;
use thiserror::Error;
use tracing::debug;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    IoError(String),

    /// TOML parse error.
    #[error("config parse error: {0}")]
    ParseError(String),

    /// Parameter validation error.
    #[error("config validation: {0}")]
    ValidationError(String),
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the teleop configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<TeleopConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::IoError(format!("failed to read {}: {e}", path.display()))
    })?;
    debug!("Loaded {} bytes from {}", text.len(), path.display());
    load_config_from_str(&text)
}

/// Load config from a TOML string.
pub fn load_config_from_str(text: &str) -> Result<TeleopConfig, ConfigError> {
    let config: TeleopConfig =
        toml::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate().map_err(ConfigError::ValidationError)?;
    Ok(config)
}
