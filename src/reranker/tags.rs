//! Intent and sentiment tags produced by upstream classifiers.
//!
//! Tags are matched exactly. Anything outside the known vocabulary is kept as
//! `Other` and treated by the filters as "no rule applies".

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Declarative,
    Interrogative,
    Imperative,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Declarative => "declarative",
            Intent::Interrogative => "interrogative",
            Intent::Imperative => "imperative",
            Intent::Other(tag) => tag,
        }
    }
}

impl From<&str> for Intent {
    fn from(tag: &str) -> Self {
        match tag {
            "declarative" => Intent::Declarative,
            "interrogative" => Intent::Interrogative,
            "imperative" => Intent::Imperative,
            other => Intent::Other(other.to_string()),
        }
    }
}

impl From<String> for Intent {
    fn from(tag: String) -> Self {
        match Intent::from(tag.as_str()) {
            Intent::Other(_) => Intent::Other(tag),
            known => known,
        }
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Neutral,
    Positive,
    /// The sentiment model declined to label the utterance.
    Skip,
    Speech,
    Negative,
    Other(String),
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Sentiment::Neutral => "neutral",
            Sentiment::Positive => "positive",
            Sentiment::Skip => "skip",
            Sentiment::Speech => "speech",
            Sentiment::Negative => "negative",
            Sentiment::Other(tag) => tag,
        }
    }
}

impl From<&str> for Sentiment {
    fn from(tag: &str) -> Self {
        match tag {
            "neutral" => Sentiment::Neutral,
            "positive" => Sentiment::Positive,
            "skip" => Sentiment::Skip,
            "speech" => Sentiment::Speech,
            "negative" => Sentiment::Negative,
            other => Sentiment::Other(other.to_string()),
        }
    }
}

impl From<String> for Sentiment {
    fn from(tag: String) -> Self {
        match Sentiment::from(tag.as_str()) {
            Sentiment::Other(_) => Sentiment::Other(tag),
            known => known,
        }
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
