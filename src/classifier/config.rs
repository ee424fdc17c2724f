use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, parse_from_env, parse_optional_path_from_env};
use crate::constants::DEFAULT_TOP_N;

/// Whether the classifier is being trained or serving.
///
/// In [`Mode::Infer`], [`SimilarityClassifier::open`](super::SimilarityClassifier::open)
/// restores the snapshot at `load_path` immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Train,
    #[default]
    Infer,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Train => write!(f, "train"),
            Mode::Infer => write!(f, "infer"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train" => Ok(Mode::Train),
            "infer" => Ok(Mode::Infer),
            other => Err(format!("unknown mode '{other}', expected 'train' or 'infer'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Ranked labels returned per query. Default: `1`.
    pub top_n: usize,

    /// Snapshot destination for [`save`](super::SimilarityClassifier::save).
    pub save_path: Option<PathBuf>,

    /// Snapshot source for [`load`](super::SimilarityClassifier::load).
    pub load_path: Option<PathBuf>,

    pub mode: Mode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            save_path: None,
            load_path: None,
            mode: Mode::default(),
        }
    }
}

impl ClassifierConfig {
    const ENV_TOP_N: &'static str = "BANTER_CLASSIFIER_TOP_N";
    const ENV_SAVE_PATH: &'static str = "BANTER_CLASSIFIER_SAVE_PATH";
    const ENV_LOAD_PATH: &'static str = "BANTER_CLASSIFIER_LOAD_PATH";
    const ENV_MODE: &'static str = "BANTER_CLASSIFIER_MODE";

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_save_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn with_load_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.load_path = Some(path.into());
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("top_n must be at least 1".to_string());
        }

        for (name, path) in [("save_path", &self.save_path), ("load_path", &self.load_path)] {
            if let Some(path) = path
                && path.as_os_str().is_empty()
            {
                return Err(format!("{name} cannot be empty when provided"));
            }
        }

        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            top_n: parse_from_env(Self::ENV_TOP_N)?.unwrap_or(defaults.top_n),
            save_path: parse_optional_path_from_env(Self::ENV_SAVE_PATH),
            load_path: parse_optional_path_from_env(Self::ENV_LOAD_PATH),
            mode: parse_from_env(Self::ENV_MODE)?.unwrap_or(defaults.mode),
        })
    }
}
