//! Core error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type for Errata
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Could not read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::Config`]
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed
    #[error("Invalid value '{value}' for {key}")]
    InvalidOverride { key: String, value: String },
}

/// Result alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
