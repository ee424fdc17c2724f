//! Intent/sentiment compatibility filters and the pool fallback chain.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tags::{Intent, Sentiment};
use super::types::TurnWindow;

/// Which stage of the fallback chain produced a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSource {
    /// Candidates passing both filters.
    Intersection,
    SentimentOnly,
    IntentOnly,
    /// Nothing passed either filter; every candidate is eligible.
    Unfiltered,
}

impl fmt::Display for PoolSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolSource::Intersection => write!(f, "intersection"),
            PoolSource::SentimentOnly => write!(f, "sentiment_only"),
            PoolSource::IntentOnly => write!(f, "intent_only"),
            PoolSource::Unfiltered => write!(f, "unfiltered"),
        }
    }
}

/// Candidate indices eligible for sampling, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub indices: Vec<usize>,
    pub source: PoolSource,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Whether a reply tagged `reply` may follow a turn tagged `last`.
pub fn intent_admits(last: &Intent, reply: &Intent) -> bool {
    match last {
        Intent::Interrogative => matches!(reply, Intent::Declarative | Intent::Imperative),
        Intent::Imperative => matches!(reply, Intent::Declarative),
        _ => true,
    }
}

/// Whether a reply tagged `reply` may follow a turn tagged `last`.
///
/// Unless the last turn is neutral, speech or positive, negative and skipped
/// replies are excluded.
pub fn sentiment_admits(last: &Sentiment, reply: &Sentiment) -> bool {
    match last {
        Sentiment::Neutral => matches!(reply, Sentiment::Neutral | Sentiment::Positive),
        Sentiment::Speech => matches!(reply, Sentiment::Speech),
        Sentiment::Positive => matches!(reply, Sentiment::Positive),
        _ => !matches!(reply, Sentiment::Negative | Sentiment::Skip),
    }
}

pub fn intent_filter(last: &Intent, replies: &[Intent]) -> Vec<usize> {
    admitted(replies, |reply| intent_admits(last, reply))
}

pub fn sentiment_filter(last: &Sentiment, replies: &[Sentiment]) -> Vec<usize> {
    admitted(replies, |reply| sentiment_admits(last, reply))
}

fn admitted<T>(replies: &[T], admits: impl Fn(&T) -> bool) -> Vec<usize> {
    replies
        .iter()
        .enumerate()
        .filter(|(_, reply)| admits(reply))
        .map(|(i, _)| i)
        .collect()
}

/// Applies the fallback chain to two ascending index sets.
///
/// Stages: intersection, then sentiment set, then intent set, then all
/// `num_candidates` indices. The first non-empty stage wins.
pub fn combine(intent: &[usize], sentiment: &[usize], num_candidates: usize) -> CandidatePool {
    let intersection: Vec<usize> = intent
        .iter()
        .copied()
        .filter(|i| sentiment.binary_search(i).is_ok())
        .collect();

    if !intersection.is_empty() {
        CandidatePool {
            indices: intersection,
            source: PoolSource::Intersection,
        }
    } else if !sentiment.is_empty() {
        CandidatePool {
            indices: sentiment.to_vec(),
            source: PoolSource::SentimentOnly,
        }
    } else if !intent.is_empty() {
        CandidatePool {
            indices: intent.to_vec(),
            source: PoolSource::IntentOnly,
        }
    } else {
        CandidatePool {
            indices: (0..num_candidates).collect(),
            source: PoolSource::Unfiltered,
        }
    }
}

/// Filters one element's candidates and resolves the pool.
pub fn select_pool(window: &TurnWindow<'_>) -> CandidatePool {
    let intent = intent_filter(window.last_intent, window.reply_intents);
    let sentiment = sentiment_filter(window.last_sentiment, window.reply_sentiments);
    combine(&intent, &sentiment, window.num_candidates())
}
