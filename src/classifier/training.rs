//! The fitted `(vector, label)` set.

use std::collections::HashMap;

use crate::storage::ModelSnapshot;
use crate::vector::{FeatureMatrix, QueryVector, VectorKind};

use super::error::{ClassifierError, ClassifierResult};

/// Stacked training vectors plus their labels.
///
/// Labels are kept verbatim. Distinct labels are indexed in order of first
/// appearance; that order is the tie-break order when ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    features: FeatureMatrix,
    labels: Vec<String>,
    row_norms: Vec<f32>,
    distinct: Vec<String>,
    row_label: Vec<usize>,
}

impl TrainingSet {
    /// Stacks `vectors` and pairs them with `labels`.
    pub fn new(vectors: &[QueryVector], labels: Vec<String>) -> ClassifierResult<Self> {
        if vectors.is_empty() {
            return Err(ClassifierError::InvalidInput {
                reason: "training vectors cannot be empty".to_string(),
            });
        }

        if vectors.len() != labels.len() {
            return Err(ClassifierError::InvalidInput {
                reason: format!(
                    "got {} training vectors but {} labels",
                    vectors.len(),
                    labels.len()
                ),
            });
        }

        let features = FeatureMatrix::stack(vectors)?;
        Self::from_parts(features, labels)
    }

    /// Rebuilds a set from already-stacked features (e.g. a restored snapshot).
    ///
    /// Inconsistent matrix buffers are rejected before any row is touched.
    pub fn from_parts(features: FeatureMatrix, labels: Vec<String>) -> ClassifierResult<Self> {
        if features.is_empty() {
            return Err(ClassifierError::InvalidInput {
                reason: "training vectors cannot be empty".to_string(),
            });
        }

        features.validate()?;

        if features.rows() != labels.len() {
            return Err(ClassifierError::InvalidInput {
                reason: format!(
                    "got {} training vectors but {} labels",
                    features.rows(),
                    labels.len()
                ),
            });
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut distinct = Vec::new();
        let mut row_label = Vec::with_capacity(labels.len());

        for label in &labels {
            let slot = *index.entry(label.as_str()).or_insert_with(|| {
                distinct.push(label.clone());
                distinct.len() - 1
            });
            row_label.push(slot);
        }

        let row_norms = features.row_norms();

        Ok(Self {
            features,
            labels,
            row_norms,
            distinct,
            row_label,
        })
    }

    pub fn from_snapshot(snapshot: ModelSnapshot) -> ClassifierResult<Self> {
        Self::from_parts(snapshot.features, snapshot.labels)
    }

    pub fn to_snapshot(&self) -> ModelSnapshot {
        ModelSnapshot::new(self.features.clone(), self.labels.clone())
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distinct labels in order of first appearance.
    pub fn distinct_labels(&self) -> &[String] {
        &self.distinct
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.features.dimension()
    }

    pub fn kind(&self) -> VectorKind {
        self.features.kind()
    }

    /// Best (max) cosine similarity of `query` to each distinct label's
    /// examples, floored at 0, in [`distinct_labels`](Self::distinct_labels) order.
    pub fn label_similarities(&self, query: &QueryVector) -> ClassifierResult<Vec<f32>> {
        let sims = self.features.similarities(query, &self.row_norms)?;

        let mut best = vec![0.0f32; self.distinct.len()];
        for (row, sim) in sims.into_iter().enumerate() {
            let slot = &mut best[self.row_label[row]];
            if sim > *slot {
                *slot = sim;
            }
        }

        Ok(best)
    }

    /// [`label_similarities`](Self::label_similarities) divided by their sum.
    ///
    /// A query with zero similarity to every example yields NaN for every
    /// label. That case is left visible rather than papered over.
    pub fn label_distribution(&self, query: &QueryVector) -> ClassifierResult<Vec<f32>> {
        let best = self.label_similarities(query)?;
        let total: f32 = best.iter().sum();
        Ok(best.into_iter().map(|s| s / total).collect())
    }
}
