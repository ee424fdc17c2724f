use thiserror::Error;

use super::VectorKind;

/// Errors raised while building or comparing feature vectors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VectorError {
    /// Vector length disagrees with the expected dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Sparse vector components are malformed.
    #[error("invalid sparse vector: {reason}")]
    InvalidSparse { reason: String },

    /// Representation not accepted in this position, or mixed within a batch.
    #[error("unsupported vector type: {reason}")]
    UnsupportedType { reason: String },
}

impl VectorError {
    pub(crate) fn mixed(first: VectorKind, other: VectorKind) -> Self {
        VectorError::UnsupportedType {
            reason: format!("mixed vector types in one batch ({first} and {other})"),
        }
    }
}

pub type VectorResult<T> = Result<T, VectorError>;
