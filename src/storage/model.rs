//! Storage model types.

use rkyv::{Archive, Deserialize, Serialize};

use crate::constants::SNAPSHOT_FORMAT_VERSION;
use crate::vector::FeatureMatrix;

/// Fitted classifier parameters persisted to disk.
///
/// Stored as `rkyv` bytes: the stacked training vectors and the verbatim label
/// list, row-aligned.
///
/// # Example
/// ```rust
/// use banter::storage::ModelSnapshot;
/// use banter::vector::FeatureMatrix;
///
/// let features = FeatureMatrix::stack_dense(&[&[1.0, 0.0][..]]).unwrap();
/// let snapshot = ModelSnapshot::new(features, vec!["greeting".to_string()]);
/// assert_eq!(snapshot.labels.len(), 1);
/// ```
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ModelSnapshot {
    /// Format version, see [`SNAPSHOT_FORMAT_VERSION`].
    pub version: u32,
    /// Stacked training vectors.
    pub features: FeatureMatrix,
    /// One label per training vector, in row order.
    pub labels: Vec<String>,
}

impl ModelSnapshot {
    pub fn new(features: FeatureMatrix, labels: Vec<String>) -> Self {
        Self {
            version: SNAPSHOT_FORMAT_VERSION,
            features,
            labels,
        }
    }
}
