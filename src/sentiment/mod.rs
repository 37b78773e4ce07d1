//! sentiment
//!
//! Lexicon-based sentiment labels for posts.
//!
//! # Modules
//!
//! - [`lexicon`] - Word valences, boosters, negations
//! - [`analyzer`] - Polarity scoring
//!
//! Scoring is stateless per post: a post's label depends only on its text.

pub mod analyzer;
pub mod lexicon;

pub use analyzer::{Scores, SentimentAnalyzer};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{Handle, Post, PostId};

/// Compound score at or above which a post is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which a post is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// All labels in reporting order.
    pub const ALL: [Label; 3] = [Label::Positive, Label::Neutral, Label::Negative];

    /// Label a compound score.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Label::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Label::Negative
        } else {
            Label::Neutral
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Neutral => "neutral",
            Label::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post with its scores and label.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPost {
    pub id: PostId,
    pub author: Handle,
    pub text: String,
    pub scores: Scores,
    pub label: Label,
}

/// Label counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    /// Count one label.
    pub fn record(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Neutral => self.neutral += 1,
            Label::Negative => self.negative += 1,
        }
    }

    /// Count for a label.
    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Positive => self.positive,
            Label::Neutral => self.neutral,
            Label::Negative => self.negative,
        }
    }

    /// Total posts counted.
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// `(label, count)` pairs in reporting order.
    pub fn entries(&self) -> [(Label, usize); 3] {
        Label::ALL.map(|label| (label, self.get(label)))
    }
}

impl fmt::Display for SentimentCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "positive={} neutral={} negative={}",
            self.positive, self.neutral, self.negative
        )
    }
}

/// Score every post with non-blank text.
///
/// Returns the scored posts (input order) and the label counts.
pub fn score_posts<'a, I>(analyzer: &SentimentAnalyzer, posts: I) -> (Vec<ScoredPost>, SentimentCounts)
where
    I: IntoIterator<Item = &'a Post>,
{
    let mut scored = Vec::new();
    let mut counts = SentimentCounts::default();

    for post in posts {
        if post.text.trim().is_empty() {
            continue;
        }
        let scores = analyzer.polarity_scores(&post.text);
        let label = Label::from_compound(scores.compound);
        counts.record(label);
        scored.push(ScoredPost {
            id: post.id.clone(),
            author: post.author.clone(),
            text: post.text.clone(),
            scores,
            label,
        });
    }

    (scored, counts)
}
