//! Error types for configuration and bank loading.
//!
//! Provides a unified error type covering I/O, serialization, and bank
//! validation failures.

use quiz_store_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading configuration or question banks.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A bank file has an extension that is neither JSON nor YAML.
    #[error("unsupported bank format: {0}")]
    UnsupportedFormat(String),

    /// A loaded bank failed validation.
    #[error("invalid bank '{path}': {source}")]
    InvalidBank {
        path: String,
        #[source]
        source: ValidationError,
    },

    /// A directory contained no bank files.
    #[error("no question banks found in {0}")]
    NoBanksFound(String),
}

/// Convenience alias for results with [`DatabaseError`].
pub type Result<T> = std::result::Result<T, DatabaseError>;
