//! Feature vectors accepted by the similarity classifier.
//!
//! Upstream vectorizers produce either dense arrays or sparse (bag-of-words
//! style) vectors, and may have nothing at all for a given utterance. These are
//! modelled as one sum type, [`QueryVector`], and every batch entering the
//! classifier is checked to be homogeneous before any math runs.

pub mod error;
pub mod matrix;
pub mod similarity;
mod sparse;


pub use error::{VectorError, VectorResult};
pub use matrix::FeatureMatrix;
pub use similarity::{cosine_similarity, l2_norm, sparse_dot};
pub use sparse::SparseVector;

use std::fmt;

/// Representation family of a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    Dense,
    Sparse,
    /// The "no vector available" sentinel.
    Empty,
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorKind::Dense => write!(f, "dense"),
            VectorKind::Sparse => write!(f, "sparse"),
            VectorKind::Empty => write!(f, "empty"),
        }
    }
}

/// A single input vector.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryVector {
    Dense(Vec<f32>),
    Sparse(SparseVector),
    /// No vector is available for this input.
    Empty,
}

impl QueryVector {
    pub fn kind(&self) -> VectorKind {
        match self {
            QueryVector::Dense(_) => VectorKind::Dense,
            QueryVector::Sparse(_) => VectorKind::Sparse,
            QueryVector::Empty => VectorKind::Empty,
        }
    }

    /// Dimensionality, or `None` for the empty sentinel.
    pub fn dimension(&self) -> Option<usize> {
        match self {
            QueryVector::Dense(v) => Some(v.len()),
            QueryVector::Sparse(v) => Some(v.dimension()),
            QueryVector::Empty => None,
        }
    }

    pub fn norm(&self) -> f32 {
        match self {
            QueryVector::Dense(v) => l2_norm(v),
            QueryVector::Sparse(v) => v.norm(),
            QueryVector::Empty => 0.0,
        }
    }

    pub fn is_empty_marker(&self) -> bool {
        matches!(self, QueryVector::Empty)
    }
}

impl From<Vec<f32>> for QueryVector {
    fn from(values: Vec<f32>) -> Self {
        QueryVector::Dense(values)
    }
}

impl From<SparseVector> for QueryVector {
    fn from(vector: SparseVector) -> Self {
        QueryVector::Sparse(vector)
    }
}

/// Returns the shared kind of `vectors`, `None` for an empty slice.
///
/// Fails with [`VectorError::UnsupportedType`] on the first entry whose kind
/// differs from the first one.
pub fn batch_kind(vectors: &[QueryVector]) -> VectorResult<Option<VectorKind>> {
    let Some(first) = vectors.first().map(QueryVector::kind) else {
        return Ok(None);
    };

    match vectors.iter().map(QueryVector::kind).find(|k| *k != first) {
        Some(other) => Err(VectorError::mixed(first, other)),
        None => Ok(Some(first)),
    }
}
