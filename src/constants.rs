//! Cross-cutting, shared constants.
//!
//! Component configs default to these values; keep them here so the env loader,
//! the JSON loader and the component `Default` impls cannot drift apart.

/// Number of ranked labels returned per query by the classifier.
pub const DEFAULT_TOP_N: usize = 1;

/// Width of the prior-context window in a flattened tag stream.
pub const DEFAULT_NUM_CONTEXT_TURNS: usize = 10;

/// Decay constant of the rank weights `exp(-k / lambda)`.
pub const DEFAULT_LAMBDA_COEFF: f64 = 10.0;

/// Decimal places kept in returned label confidences.
pub const SCORE_DECIMALS: i32 = 2;

/// On-disk snapshot format version. Bump when [`crate::storage::ModelSnapshot`] changes shape.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Suffix appended to the snapshot path while a save is in flight.
pub const SNAPSHOT_TEMP_SUFFIX: &str = "tmp";

/// Rounds `value` to [`SCORE_DECIMALS`] decimal places. NaN stays NaN.
#[inline]
pub fn round_score(value: f32) -> f32 {
    let factor = 10f32.powi(SCORE_DECIMALS);
    (value * factor).round() / factor
}
