use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::error::{RerankerError, RerankerResult};

/// Normalized weights `exp(-k / lambda)` for pool positions `0..len`.
///
/// Earlier positions are always at least as likely as later ones; a larger
/// `lambda` flattens the distribution.
///
/// `lambda` must be positive and finite. Zero yields NaN weights and a
/// negative value favors later positions; [`sample_position`] rejects both.
pub fn rank_weights(len: usize, lambda: f64) -> Vec<f64> {
    let raw: Vec<f64> = (0..len).map(|k| (-(k as f64) / lambda).exp()).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Draws one pool position according to [`rank_weights`].
pub fn sample_position<R: Rng + ?Sized>(
    len: usize,
    lambda: f64,
    rng: &mut R,
) -> RerankerResult<usize> {
    if !lambda.is_finite() || lambda <= 0.0 {
        return Err(RerankerError::Sampling {
            reason: format!("lambda must be a positive finite number, got {lambda}"),
        });
    }

    let index = WeightedIndex::new(rank_weights(len, lambda))?;
    Ok(index.sample(rng))
}
