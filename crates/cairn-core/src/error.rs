//! Error types for the cairn-core crate.

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found: {path}")]
    MissingDirectory { path: String },

    #[error("Failed to read config directory: {0}")]
    Read(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors raised while assembling a graph payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Duplicate element id in payload: {0}")]
    DuplicateElementId(String),
}
