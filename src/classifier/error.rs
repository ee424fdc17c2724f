use thiserror::Error;

use crate::storage::StorageError;
use crate::vector::VectorError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unsupported vector type: {reason}")]
    UnsupportedType { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// `classify` (or `save`) was called before a successful `fit` or `load`.
    #[error("classifier is not fitted: call fit() or load() first")]
    NotFitted,

    #[error("invalid classifier configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("snapshot error: {0}")]
    Storage(#[from] StorageError),
}

impl From<VectorError> for ClassifierError {
    fn from(err: VectorError) -> Self {
        match err {
            VectorError::DimensionMismatch { expected, actual } => {
                ClassifierError::DimensionMismatch { expected, actual }
            }
            VectorError::UnsupportedType { reason } => ClassifierError::UnsupportedType { reason },
            VectorError::InvalidSparse { reason } => ClassifierError::InvalidInput { reason },
        }
    }
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;
