//! Nearest-label classification by cosine similarity.
//!
//! The classifier memorizes labeled vectors. A query is compared with every
//! stored vector; each label is scored by its best-matching example (max, not
//! mean), and the per-label scores are normalized to sum to 1.
//!
//! # Edge cases
//!
//! - The empty sentinel ([`QueryVector::Empty`]) scores 0 against everything.
//! - A query with zero similarity to every example has a zero normalization
//!   denominator; every returned score is NaN. This is surfaced, not masked,
//!   so callers can see the vectorizer produced nothing usable.
//! - Ties are broken by the order in which labels first appear in the
//!   training data, so top-N output is deterministic.

pub mod config;
pub mod error;
mod training;
pub mod types;


pub use config::{ClassifierConfig, Mode};
pub use error::{ClassifierError, ClassifierResult};
pub use training::TrainingSet;
pub use types::{LabelScore, Prediction};

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::round_score;
use crate::storage::SnapshotFile;
use crate::vector::{QueryVector, VectorKind, batch_kind};

pub struct SimilarityClassifier {
    config: ClassifierConfig,
    training: Option<TrainingSet>,
}

impl std::fmt::Debug for SimilarityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityClassifier")
            .field("config", &self.config)
            .field("fitted", &self.is_fitted())
            .field("rows", &self.training.as_ref().map(TrainingSet::len))
            .finish()
    }
}

impl SimilarityClassifier {
    /// Creates an unfitted classifier.
    pub fn new(config: ClassifierConfig) -> ClassifierResult<Self> {
        if let Err(reason) = config.validate() {
            return Err(ClassifierError::InvalidConfig { reason });
        }

        Ok(Self {
            config,
            training: None,
        })
    }

    /// Creates a classifier and, in [`Mode::Infer`], restores it from `load_path`.
    pub fn open(config: ClassifierConfig) -> ClassifierResult<Self> {
        let mut classifier = Self::new(config)?;

        match classifier.config.mode {
            Mode::Infer => classifier.load()?,
            Mode::Train => debug!("Classifier opened in train mode, skipping load"),
        }

        Ok(classifier)
    }

    /// Replaces the training set with `vectors` and their `labels`.
    ///
    /// On error the previous training set (if any) is kept.
    pub fn fit<I, S>(&mut self, vectors: &[QueryVector], labels: I) -> ClassifierResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let training = TrainingSet::new(vectors, labels)?;

        info!(
            rows = training.len(),
            labels = training.distinct_labels().len(),
            dimension = training.dimension(),
            kind = %training.kind(),
            "Fitted similarity classifier"
        );

        self.training = Some(training);
        Ok(())
    }

    fn training(&self) -> ClassifierResult<&TrainingSet> {
        self.training.as_ref().ok_or(ClassifierError::NotFitted)
    }

    /// Ranks labels for each query. Output is position-aligned with `queries`.
    pub fn classify(&self, queries: &[QueryVector]) -> ClassifierResult<Vec<Prediction>> {
        let training = self.training()?;
        let kind = batch_kind(queries)?;

        debug!(
            num_queries = queries.len(),
            kind = ?kind,
            top_n = self.config.top_n,
            "Classifying queries"
        );

        queries
            .iter()
            .enumerate()
            .map(|(i, query)| {
                let distribution = self.checked_distribution(training, i, query)?;
                Ok(self.rank(training, &distribution))
            })
            .collect()
    }

    pub fn classify_one(&self, query: &QueryVector) -> ClassifierResult<Prediction> {
        let training = self.training()?;
        let distribution = self.checked_distribution(training, 0, query)?;
        Ok(self.rank(training, &distribution))
    }

    /// Same ranking as [`classify`](Self::classify), split into parallel
    /// `(labels, scores)` lists per query.
    pub fn predict(
        &self,
        queries: &[QueryVector],
    ) -> ClassifierResult<(Vec<Vec<String>>, Vec<Vec<f32>>)> {
        let predictions = self.classify(queries)?;

        Ok(predictions
            .into_iter()
            .map(|p| {
                p.ranked
                    .into_iter()
                    .map(|s| (s.label, s.score))
                    .unzip::<_, _, Vec<_>, Vec<_>>()
            })
            .unzip())
    }

    /// Full normalized distribution over every distinct label, unrounded and
    /// in first-appearance order.
    pub fn distribution(&self, queries: &[QueryVector]) -> ClassifierResult<Vec<Vec<LabelScore>>> {
        let training = self.training()?;
        batch_kind(queries)?;

        queries
            .iter()
            .enumerate()
            .map(|(i, query)| {
                let distribution = self.checked_distribution(training, i, query)?;
                Ok(training
                    .distinct_labels()
                    .iter()
                    .zip(distribution)
                    .map(|(label, score)| LabelScore::new(label.clone(), score))
                    .collect())
            })
            .collect()
    }

    fn checked_distribution(
        &self,
        training: &TrainingSet,
        position: usize,
        query: &QueryVector,
    ) -> ClassifierResult<Vec<f32>> {
        let distribution = training.label_distribution(query)?;

        if distribution.iter().any(|s| s.is_nan()) {
            warn!(
                position,
                kind = %query.kind(),
                "Query has zero similarity to every training vector; scores are NaN"
            );
        }

        Ok(distribution)
    }

    fn rank(&self, training: &TrainingSet, distribution: &[f32]) -> Prediction {
        let mut order: Vec<usize> = (0..distribution.len()).collect();

        // Stable: equal scores keep first-appearance order.
        order.sort_by(|&a, &b| distribution[b].total_cmp(&distribution[a]));

        let labels = training.distinct_labels();
        Prediction::new(
            order
                .into_iter()
                .take(self.config.top_n)
                .map(|i| LabelScore::new(labels[i].clone(), round_score(distribution[i])))
                .collect(),
        )
    }

    /// Saves the training set to the configured `save_path`.
    pub fn save(&self) -> ClassifierResult<PathBuf> {
        let path = self
            .config
            .save_path
            .clone()
            .ok_or_else(|| ClassifierError::InvalidConfig {
                reason: "save_path is not configured".to_string(),
            })?;
        self.save_to(path)
    }

    /// Saves the training set to `path` and returns the resolved path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> ClassifierResult<PathBuf> {
        let training = self.training()?;
        let file = SnapshotFile::new(path);

        info!(path = %file.path().display(), rows = training.len(), "Saving classifier");
        file.write(&training.to_snapshot())?;

        Ok(file.path().to_path_buf())
    }

    /// Restores the training set from the configured `load_path`.
    pub fn load(&mut self) -> ClassifierResult<()> {
        let path = self
            .config
            .load_path
            .clone()
            .ok_or_else(|| ClassifierError::InvalidConfig {
                reason: "load_path is not configured".to_string(),
            })?;
        self.load_from(path)
    }

    /// Restores the training set from `path`. The current set is kept on error.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) -> ClassifierResult<()> {
        let file = SnapshotFile::new(path);
        info!(path = %file.path().display(), "Loading classifier");

        let training = TrainingSet::from_snapshot(file.read()?)?;

        info!(
            rows = training.len(),
            labels = training.distinct_labels().len(),
            dimension = training.dimension(),
            "Classifier loaded"
        );

        self.training = Some(training);
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.training.is_some()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn top_n(&self) -> usize {
        self.config.top_n
    }

    /// Number of stored training vectors (0 when unfitted).
    pub fn len(&self) -> usize {
        self.training.as_ref().map_or(0, TrainingSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> Option<usize> {
        self.training.as_ref().map(TrainingSet::dimension)
    }

    pub fn kind(&self) -> Option<VectorKind> {
        self.training.as_ref().map(TrainingSet::kind)
    }

    pub fn labels(&self) -> &[String] {
        self.training
            .as_ref()
            .map(TrainingSet::labels)
            .unwrap_or(&[])
    }

    pub fn distinct_labels(&self) -> &[String] {
        self.training
            .as_ref()
            .map(TrainingSet::distinct_labels)
            .unwrap_or(&[])
    }

    pub fn training_set(&self) -> Option<&TrainingSet> {
        self.training.as_ref()
    }
}
