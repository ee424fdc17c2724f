use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A label with its normalized confidence.
pub struct LabelScore {
    pub label: String,
    /// Confidence in `[0, 1]`, or NaN when the query matched nothing.
    pub score: f32,
}

impl LabelScore {
    pub fn new<S: Into<String>>(label: S, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

impl std::fmt::Display for LabelScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.2})", self.label, self.score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Up to `top_n` labels for one query, most confident first.
pub struct Prediction {
    pub ranked: Vec<LabelScore>,
}

impl Prediction {
    pub fn new(ranked: Vec<LabelScore>) -> Self {
        Self { ranked }
    }

    /// Returns the best label, if any.
    pub fn top(&self) -> Option<&LabelScore> {
        self.ranked.first()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ranked.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn scores(&self) -> Vec<f32> {
        self.ranked.iter().map(|s| s.score).collect()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelScore> {
        self.ranked.iter()
    }
}

impl<'a> IntoIterator for &'a Prediction {
    type Item = &'a LabelScore;
    type IntoIter = std::slice::Iter<'a, LabelScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranked.iter()
    }
}
