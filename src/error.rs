//! Error types for treebloom.
//!
//! The animation core itself has no failure modes: degenerate inputs are
//! absorbed. Errors only come from reading and writing configuration.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading or saving a [`SceneConfig`](crate::SceneConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("Failed to access config file: {0}")]
    Io(#[from] io::Error),

    /// The file is not a valid scene configuration.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
