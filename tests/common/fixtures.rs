//! Test fixtures for integration tests.

use banter::reranker::RerankBatch;
use banter::vector::{QueryVector, SparseVector};

pub const DEFAULT_CONTEXT_TURNS: usize = 10;

pub const DEFAULT_DIMENSION: usize = 16;

/// A small FAQ corpus: `(utterance, label)`.
pub const FAQ: &[(&str, &str)] = &[
    ("what are your opening hours", "hours"),
    ("when do you open", "hours"),
    ("are you open on sunday", "hours"),
    ("how much does it cost", "price"),
    ("what is the price", "price"),
    ("where are you located", "address"),
    ("what is your address", "address"),
];

/// Fixed vocabulary built from [`FAQ`] in first-seen order.
pub fn vocabulary() -> Vec<&'static str> {
    let mut vocab: Vec<&'static str> = Vec::new();
    for &(text, _) in FAQ {
        for word in text.split_whitespace() {
            if !vocab.contains(&word) {
                vocab.push(word);
            }
        }
    }
    vocab
}

/// Term-count vector over `vocab`. Unknown words are dropped.
pub fn bag_of_words(text: &str, vocab: &[&str]) -> SparseVector {
    let (indices, values): (Vec<u32>, Vec<f32>) = text
        .split_whitespace()
        .filter_map(|w| vocab.iter().position(|v| *v == w))
        .map(|i| (i as u32, 1.0))
        .unzip();

    SparseVector::new(vocab.len(), indices, values).expect("indices come from the vocabulary")
}

pub fn faq_vectors(vocab: &[&str]) -> (Vec<QueryVector>, Vec<String>) {
    FAQ.iter()
        .map(|(text, label)| {
            (
                QueryVector::Sparse(bag_of_words(text, vocab)),
                label.to_string(),
            )
        })
        .unzip()
}

/// Deterministic pseudo-random dense vector in `[-1, 1)`.
pub fn seeded_vector(seed: u64, dimension: usize) -> Vec<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..dimension)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        })
        .collect()
}

/// `count` dense training vectors cycling through `labels`.
pub fn dense_training_set(count: usize, labels: &[&str]) -> (Vec<QueryVector>, Vec<String>) {
    (0..count)
        .map(|i| {
            (
                QueryVector::Dense(seeded_vector(i as u64, DEFAULT_DIMENSION)),
                labels[i % labels.len()].to_string(),
            )
        })
        .unzip()
}

/// One element of a rerank batch: the last context turn's tags plus
/// per-candidate tags. Earlier context turns are padded with neutral tags.
#[derive(Debug, Clone)]
pub struct Element {
    pub last_intent: &'static str,
    pub last_sentiment: &'static str,
    pub candidates: Vec<(&'static str, f32, &'static str, &'static str)>,
}

impl Element {
    pub fn new(last_intent: &'static str, last_sentiment: &'static str) -> Self {
        Self {
            last_intent,
            last_sentiment,
            candidates: Vec::new(),
        }
    }

    /// Adds a candidate `(text, score, intent, sentiment)`.
    pub fn candidate(
        mut self,
        text: &'static str,
        score: f32,
        intent: &'static str,
        sentiment: &'static str,
    ) -> Self {
        self.candidates.push((text, score, intent, sentiment));
        self
    }
}

#[derive(Debug, Clone)]
pub struct RerankBatchBuilder {
    context_turns: usize,
    elements: Vec<Element>,
}

impl Default for RerankBatchBuilder {
    fn default() -> Self {
        Self {
            context_turns: DEFAULT_CONTEXT_TURNS,
            elements: Vec::new(),
        }
    }
}

impl RerankBatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context_turns(mut self, turns: usize) -> Self {
        self.context_turns = turns;
        self
    }

    pub fn element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn build(self) -> RerankBatch {
        let mut candidates = Vec::new();
        let mut scores = Vec::new();
        let mut sentiments = Vec::new();
        let mut intents = Vec::new();

        for element in self.elements {
            for _ in 1..self.context_turns {
                intents.push("declarative");
                sentiments.push("neutral");
            }
            intents.push(element.last_intent);
            sentiments.push(element.last_sentiment);

            let mut texts = Vec::new();
            let mut element_scores = Vec::new();
            for (text, score, intent, sentiment) in element.candidates {
                texts.push(text);
                element_scores.push(score);
                intents.push(intent);
                sentiments.push(sentiment);
            }
            candidates.push(texts);
            scores.push(element_scores);
        }

        RerankBatch::new(candidates, scores, sentiments, intents)
    }
}
