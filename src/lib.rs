//! Banter library crate: the two decision components of a chit-chat pipeline.
//!
//! # Public API Surface
//!
//! ## Classification
//! - [`SimilarityClassifier`], [`ClassifierConfig`], [`Mode`] - Nearest-label
//!   cosine classifier with max-per-label aggregation
//! - [`LabelScore`], [`Prediction`] - Ranked output for one query
//! - [`QueryVector`], [`SparseVector`], [`FeatureMatrix`] - Vector inputs and
//!   stacked training storage
//!
//! ## Re-ranking
//! - [`ResponseReRanker`], [`RerankerConfig`] - Intent/sentiment filtering with
//!   rank-weighted sampling
//! - [`RerankBatch`], [`RerankOutput`], [`Intent`], [`Sentiment`] - Batch I/O
//! - [`CandidatePool`], [`PoolSource`] - Filter results, for diagnostics
//!
//! ## Persistence
//! - [`SnapshotFile`], [`ModelSnapshot`] - rkyv snapshots of a fitted classifier
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - JSON or `BANTER_*` environment loading
//!
//! The library never installs a `tracing` subscriber; that is left to the
//! embedding application.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod reranker;
pub mod storage;
pub mod vector;

pub use classifier::{
    ClassifierConfig, ClassifierError, ClassifierResult, LabelScore, Mode, Prediction,
    SimilarityClassifier, TrainingSet,
};
pub use config::{Config, ConfigError};
pub use constants::{
    DEFAULT_LAMBDA_COEFF, DEFAULT_NUM_CONTEXT_TURNS, DEFAULT_TOP_N, SCORE_DECIMALS, round_score,
};
pub use reranker::{
    CandidatePool, Intent, PoolSource, RerankBatch, RerankOutput, RerankerConfig, RerankerError,
    RerankerResult, ResponseReRanker, Sentiment, rank_weights,
};
pub use storage::{ModelSnapshot, SnapshotFile, StorageError, StorageResult};
pub use vector::{
    FeatureMatrix, QueryVector, SparseVector, VectorError, VectorKind, cosine_similarity,
};
