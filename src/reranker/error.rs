use thiserror::Error;

#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Every element must carry the same number of candidates; the tag window
    /// width is derived from it.
    #[error("non-uniform batch: element {position} has {actual} candidates, expected {expected}")]
    NonUniformBatch {
        position: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "{stream} tag stream has {actual} entries, expected {expected} ({elements} elements x window {window})"
    )]
    TagWindowMismatch {
        stream: &'static str,
        expected: usize,
        actual: usize,
        elements: usize,
        window: usize,
    },

    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("sampling failed: {reason}")]
    Sampling { reason: String },
}

impl From<rand::distr::weighted::Error> for RerankerError {
    fn from(err: rand::distr::weighted::Error) -> Self {
        RerankerError::Sampling {
            reason: err.to_string(),
        }
    }
}

pub type RerankerResult<T> = Result<T, RerankerError>;
