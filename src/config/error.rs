//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("failed to parse {name}='{value}': {reason}")]
    InvalidEnvValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A component section failed validation.
    #[error("invalid {section} configuration: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },

    /// Config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document is not valid JSON for [`Config`](super::Config).
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
