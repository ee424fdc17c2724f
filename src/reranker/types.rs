use serde::{Deserialize, Serialize};

use super::tags::{Intent, Sentiment};

/// One `rerank` call's input.
///
/// `candidates[i]` and `scores[i]` are parallel lists for element `i`. The tag
/// streams are flat: element `i` owns the window
/// `[i * width, (i + 1) * width)` where `width = num_context_turns + num_candidates`.
/// Inside a window, context turns come first and candidate tags follow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RerankBatch {
    pub candidates: Vec<Vec<String>>,
    pub scores: Vec<Vec<f32>>,
    pub sentiment_tags: Vec<Sentiment>,
    pub intent_tags: Vec<Intent>,
}

impl RerankBatch {
    pub fn new<C, S, T>(
        candidates: Vec<Vec<C>>,
        scores: Vec<Vec<f32>>,
        sentiment_tags: impl IntoIterator<Item = S>,
        intent_tags: impl IntoIterator<Item = T>,
    ) -> Self
    where
        C: Into<String>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            candidates: candidates
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            scores,
            sentiment_tags: sentiment_tags
                .into_iter()
                .map(|t| Sentiment::from(t.as_ref()))
                .collect(),
            intent_tags: intent_tags
                .into_iter()
                .map(|t| Intent::from(t.as_ref()))
                .collect(),
        }
    }

    /// Number of conversation elements.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Tags of one element, sliced out of the flat streams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnWindow<'a> {
    pub last_intent: &'a Intent,
    pub last_sentiment: &'a Sentiment,
    pub reply_intents: &'a [Intent],
    pub reply_sentiments: &'a [Sentiment],
}

impl<'a> TurnWindow<'a> {
    /// Slices the window starting at `start`. Bounds are checked by the caller.
    pub(crate) fn slice(
        intents: &'a [Intent],
        sentiments: &'a [Sentiment],
        start: usize,
        num_context_turns: usize,
        num_candidates: usize,
    ) -> Self {
        let last = start + num_context_turns - 1;
        let replies = start + num_context_turns..start + num_context_turns + num_candidates;

        Self {
            last_intent: &intents[last],
            last_sentiment: &sentiments[last],
            reply_intents: &intents[replies.clone()],
            reply_sentiments: &sentiments[replies],
        }
    }

    pub fn num_candidates(&self) -> usize {
        self.reply_intents.len()
    }
}

/// Chosen responses and their base scores, one per input element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RerankOutput {
    pub responses: Vec<String>,
    pub scores: Vec<f32>,
}

impl RerankOutput {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            responses: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, response: String, score: f32) {
        self.responses.push(response);
        self.scores.push(score);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.responses
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
    }
}
