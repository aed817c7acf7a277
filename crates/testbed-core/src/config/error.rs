//! # Testbed Core Harness Configuration Errors
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Serialization to '{format}' failed: {reason}")]
    Serialization { format: String, reason: String },

    #[error("Deserialization from '{format}' failed: {reason}")]
    Deserialization { format: String, reason: String },
}
