//! Error types for cardioscope-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating core state.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::ViewerConfig`].
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A configuration value is out of its allowed range.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Data size mismatch between an attribute array and its owner.
    #[error("data size mismatch for '{name}': expected {expected} tuples, got {actual}")]
    SizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// A specialized Result type for cardioscope-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
