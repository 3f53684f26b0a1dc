//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating assetcheck.toml
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid config file")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Validation(String),
}
