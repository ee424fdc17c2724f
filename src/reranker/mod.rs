//! Heuristic re-ranking of chit-chat reply candidates.
//!
//! For every conversation element the reranker looks at the intent and
//! sentiment of the last context turn, keeps the candidates whose tags are
//! compatible with it, and samples one survivor. Earlier candidates (in
//! original order) are favored with weight `exp(-k / lambda_coeff)`.
//!
//! When the filters disagree the pool falls back in a fixed order:
//! intersection, sentiment matches, intent matches, then every candidate.
//! See [`PoolSource`].

pub mod config;
pub mod error;
pub mod filter;
pub mod sampling;
pub mod tags;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::RerankerConfig;
pub use error::{RerankerError, RerankerResult};
pub use filter::{CandidatePool, PoolSource, combine, intent_filter, select_pool, sentiment_filter};
pub use sampling::{rank_weights, sample_position};
pub use tags::{Intent, Sentiment};
pub use types::{RerankBatch, RerankOutput, TurnWindow};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

pub struct ResponseReRanker {
    config: RerankerConfig,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for ResponseReRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseReRanker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResponseReRanker {
    pub fn new(config: RerankerConfig) -> RerankerResult<Self> {
        if let Err(reason) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        debug!(
            num_context_turns = config.num_context_turns,
            lambda_coeff = config.lambda_coeff,
            seeded = config.seed.is_some(),
            "Created response reranker"
        );

        Ok(Self {
            config,
            rng: Mutex::new(rng),
        })
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    /// Picks one response per element using the internal random source.
    ///
    /// The source is locked only while drawing; validation and filtering run
    /// unlocked.
    pub fn rerank(&self, batch: &RerankBatch) -> RerankerResult<RerankOutput> {
        let pools = self.candidate_pools(batch)?;
        let chosen = {
            let mut rng = self.rng.lock();
            self.draw(&pools, &mut *rng)?
        };
        Ok(Self::emit(batch, &pools, &chosen))
    }

    /// Picks one response per element, drawing from `rng`.
    pub fn rerank_with_rng<R: Rng + ?Sized>(
        &self,
        batch: &RerankBatch,
        rng: &mut R,
    ) -> RerankerResult<RerankOutput> {
        let pools = self.candidate_pools(batch)?;
        let chosen = self.draw(&pools, rng)?;
        Ok(Self::emit(batch, &pools, &chosen))
    }

    /// Draws one candidate index per pool.
    fn draw<R: Rng + ?Sized>(
        &self,
        pools: &[CandidatePool],
        rng: &mut R,
    ) -> RerankerResult<Vec<usize>> {
        pools
            .iter()
            .map(|pool| {
                let k = sample_position(pool.len(), self.config.lambda_coeff, rng)?;
                Ok(pool.indices[k])
            })
            .collect()
    }

    fn emit(batch: &RerankBatch, pools: &[CandidatePool], chosen: &[usize]) -> RerankOutput {
        let mut output = RerankOutput::with_capacity(chosen.len());

        for (position, (&index, pool)) in chosen.iter().zip(pools).enumerate() {
            debug!(
                position,
                chosen = index,
                pool = pool.len(),
                source = %pool.source,
                "Sampled response"
            );

            output.push(
                batch.candidates[position][index].clone(),
                batch.scores[position][index],
            );
        }

        output
    }

    /// Filters every element without sampling.
    pub fn candidate_pools(&self, batch: &RerankBatch) -> RerankerResult<Vec<CandidatePool>> {
        let windows = self.windows(batch)?;

        debug!(
            elements = batch.len(),
            candidates = windows.first().map_or(0, TurnWindow::num_candidates),
            "Filtering rerank batch"
        );

        Ok(windows
            .iter()
            .enumerate()
            .map(|(position, window)| {
                let pool = select_pool(window);
                if pool.source == PoolSource::Unfiltered {
                    warn!(
                        position,
                        last_intent = %window.last_intent,
                        last_sentiment = %window.last_sentiment,
                        "No candidate passed either filter, sampling from all"
                    );
                }
                pool
            })
            .collect())
    }

    /// Filters a single element of `batch`.
    pub fn select(&self, batch: &RerankBatch, position: usize) -> RerankerResult<CandidatePool> {
        let windows = self.windows(batch)?;
        let window = windows.get(position).ok_or_else(|| RerankerError::InvalidInput {
            reason: format!(
                "position {position} is out of range for a batch of {}",
                batch.len()
            ),
        })?;
        Ok(select_pool(window))
    }

    /// Sampling distribution over a pool of `len` candidates.
    pub fn rank_weights(&self, len: usize) -> Vec<f64> {
        rank_weights(len, self.config.lambda_coeff)
    }

    /// Validates the batch shape and slices one tag window per element.
    fn windows<'a>(&self, batch: &'a RerankBatch) -> RerankerResult<Vec<TurnWindow<'a>>> {
        if batch.candidates.len() != batch.scores.len() {
            return Err(RerankerError::InvalidInput {
                reason: format!(
                    "got {} candidate lists but {} score lists",
                    batch.candidates.len(),
                    batch.scores.len()
                ),
            });
        }

        for (position, (candidates, scores)) in
            batch.candidates.iter().zip(&batch.scores).enumerate()
        {
            if candidates.is_empty() {
                return Err(RerankerError::InvalidInput {
                    reason: format!("element {position} has no candidates"),
                });
            }
            if candidates.len() != scores.len() {
                return Err(RerankerError::InvalidInput {
                    reason: format!(
                        "element {position} has {} candidates but {} scores",
                        candidates.len(),
                        scores.len()
                    ),
                });
            }
        }

        let num_candidates = batch.candidates.first().map_or(0, Vec::len);
        if let Some((position, actual)) = batch
            .candidates
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != num_candidates)
        {
            return Err(RerankerError::NonUniformBatch {
                position,
                expected: num_candidates,
                actual,
            });
        }

        let turns = self.config.num_context_turns;
        let window = turns + num_candidates;
        let expected = batch.len() * window;

        for (stream, actual) in [
            ("sentiment", batch.sentiment_tags.len()),
            ("intent", batch.intent_tags.len()),
        ] {
            if actual != expected {
                return Err(RerankerError::TagWindowMismatch {
                    stream,
                    expected,
                    actual,
                    elements: batch.len(),
                    window,
                });
            }
        }

        Ok((0..batch.len())
            .map(|i| {
                TurnWindow::slice(
                    &batch.intent_tags,
                    &batch.sentiment_tags,
                    i * window,
                    turns,
                    num_candidates,
                )
            })
            .collect())
    }
}
