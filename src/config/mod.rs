//! Crate configuration.
//!
//! Every setting has a default. Override with `BANTER_*` environment variables
//! via [`Config::from_env`], or load a JSON document with the same shape as the
//! pipeline's component blocks via [`Config::from_json_str`].

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;
use crate::reranker::RerankerConfig;

/// Configuration for both components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Similarity classifier settings.
    pub classifier: ClassifierConfig,

    /// Response re-ranker settings.
    pub reranker: RerankerConfig,
}

impl Config {
    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            classifier: ClassifierConfig::from_env()?,
            reranker: RerankerConfig::from_env()?,
        })
    }

    /// Parses a JSON document. Missing sections and fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                section: "classifier",
                reason,
            })?;

        self.reranker
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                section: "reranker",
                reason,
            })?;

        Ok(())
    }
}

/// Reads and parses `name`. Unset (or blank) yields `None`; unparseable is an error.
pub(crate) fn parse_from_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidEnvValue {
                name,
                value: value.clone(),
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}

pub(crate) fn parse_optional_path_from_env(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
