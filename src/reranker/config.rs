use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, parse_from_env};
use crate::constants::{DEFAULT_LAMBDA_COEFF, DEFAULT_NUM_CONTEXT_TURNS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankerConfig {
    /// Context positions preceding the candidate positions in each tag window.
    pub num_context_turns: usize,

    /// Decay of the rank weights `exp(-k / lambda_coeff)`.
    pub lambda_coeff: f64,

    /// Seeds the internal random source. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            num_context_turns: DEFAULT_NUM_CONTEXT_TURNS,
            lambda_coeff: DEFAULT_LAMBDA_COEFF,
            seed: None,
        }
    }
}

impl RerankerConfig {
    const ENV_CONTEXT_TURNS: &'static str = "BANTER_RERANKER_CONTEXT_TURNS";
    const ENV_LAMBDA: &'static str = "BANTER_RERANKER_LAMBDA";
    const ENV_SEED: &'static str = "BANTER_RERANKER_SEED";

    pub fn new(num_context_turns: usize, lambda_coeff: f64) -> Self {
        Self {
            num_context_turns,
            lambda_coeff,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.num_context_turns == 0 {
            return Err("num_context_turns must be at least 1".to_string());
        }

        if !self.lambda_coeff.is_finite() || self.lambda_coeff <= 0.0 {
            return Err(format!(
                "lambda_coeff must be a positive finite number, got {}",
                self.lambda_coeff
            ));
        }

        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            num_context_turns: parse_from_env(Self::ENV_CONTEXT_TURNS)?
                .unwrap_or(defaults.num_context_turns),
            lambda_coeff: parse_from_env(Self::ENV_LAMBDA)?.unwrap_or(defaults.lambda_coeff),
            seed: parse_from_env(Self::ENV_SEED)?,
        })
    }
}
