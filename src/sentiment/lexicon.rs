//! sentiment::lexicon
//!
//! Valence lexicon, booster words, and negations.
//!
//! Valences use the -4.0 (most negative) to +4.0 (most positive) scale.
//! The built-in list covers general English plus vocabulary common in
//! posts about technology.

use std::collections::HashMap;

/// Boost applied by an intensifier (or subtracted by a dampener).
pub const BOOST_INCREMENT: f64 = 0.293;

/// A sentiment lexicon.
pub trait SentimentLexicon {
    /// Valence of a lowercased word, if it carries sentiment.
    fn valence(&self, word: &str) -> Option<f64>;

    /// Booster scalar for a lowercased word (positive intensifies,
    /// negative dampens).
    fn booster(&self, word: &str) -> Option<f64>;

    /// Whether a lowercased word negates what follows.
    fn is_negation(&self, word: &str) -> bool;
}

/// The built-in lexicon.
#[derive(Debug, Clone)]
pub struct DefaultLexicon {
    valences: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: Vec<&'static str>,
}

impl DefaultLexicon {
    /// Create the built-in lexicon.
    pub fn new() -> Self {
        let positive: &[(&str, f64)] = &[
            ("good", 1.9),
            ("great", 3.1),
            ("love", 3.2),
            ("loved", 2.9),
            ("loving", 2.9),
            ("like", 1.5),
            ("liked", 1.8),
            ("excellent", 2.7),
            ("amazing", 2.8),
            ("awesome", 3.1),
            ("wonderful", 2.7),
            ("fantastic", 2.6),
            ("brilliant", 2.8),
            ("best", 3.2),
            ("better", 1.9),
            ("happy", 2.7),
            ("glad", 2.0),
            ("nice", 1.8),
            ("cool", 1.3),
            ("fun", 2.3),
            ("exciting", 2.2),
            ("excited", 1.4),
            ("interesting", 1.7),
            ("impressive", 2.3),
            ("incredible", 2.4),
            ("powerful", 1.8),
            ("helpful", 1.7),
            ("useful", 1.9),
            ("innovative", 1.6),
            ("innovation", 1.5),
            ("creative", 1.9),
            ("beautiful", 2.9),
            ("win", 2.8),
            ("winning", 2.4),
            ("success", 2.7),
            ("successful", 2.8),
            ("thanks", 1.9),
            ("thank", 1.5),
            ("grateful", 2.0),
            ("hope", 1.9),
            ("hopeful", 1.6),
            ("opportunity", 1.8),
            ("opportunities", 1.6),
            ("benefit", 1.6),
            ("improve", 1.9),
            ("improved", 2.1),
            ("easy", 1.9),
            ("free", 2.3),
            ("safe", 1.9),
            ("support", 1.7),
            ("perfect", 2.7),
            ("enjoy", 2.2),
            ("recommend", 1.5),
            ("wow", 2.8),
            ("yes", 1.7),
        ];

        let negative: &[(&str, f64)] = &[
            ("bad", -2.5),
            ("worse", -2.1),
            ("worst", -3.1),
            ("terrible", -2.1),
            ("awful", -2.0),
            ("horrible", -2.5),
            ("hate", -2.7),
            ("hated", -3.2),
            ("sad", -2.1),
            ("angry", -2.3),
            ("fear", -2.2),
            ("scary", -2.2),
            ("scared", -1.9),
            ("afraid", -2.0),
            ("dangerous", -2.1),
            ("danger", -2.4),
            ("threat", -2.4),
            ("wrong", -2.1),
            ("problem", -1.7),
            ("problems", -1.7),
            ("fail", -2.5),
            ("failed", -2.3),
            ("failure", -2.3),
            ("broken", -2.0),
            ("useless", -1.8),
            ("boring", -1.3),
            ("disappointing", -2.2),
            ("disappointed", -1.9),
            ("worried", -1.2),
            ("worry", -1.9),
            ("risk", -1.1),
            ("risky", -1.4),
            ("fake", -2.1),
            ("poor", -2.1),
            ("ugly", -3.1),
            ("stupid", -2.4),
            ("kill", -3.7),
            ("killing", -3.4),
            ("lose", -1.7),
            ("lost", -1.3),
            ("loss", -1.3),
            ("crisis", -3.1),
            ("scam", -2.6),
            ("lie", -1.6),
            ("lies", -1.8),
            ("steal", -2.2),
            ("stolen", -2.2),
            ("harm", -2.5),
            ("harmful", -2.6),
            ("bias", -0.4),
            ("biased", -1.1),
            ("hype", -0.8),
            ("overhyped", -1.4),
            ("unemployment", -1.9),
            ("no", -1.2),
        ];

        let mut valences = HashMap::new();
        for (word, score) in positive.iter().chain(negative.iter()) {
            valences.insert(*word, *score);
        }

        let mut boosters = HashMap::new();
        for word in [
            "very",
            "really",
            "extremely",
            "absolutely",
            "incredibly",
            "so",
            "super",
            "totally",
            "completely",
            "highly",
            "hugely",
            "most",
            "more",
            "deeply",
            "truly",
        ] {
            boosters.insert(word, BOOST_INCREMENT);
        }
        for word in [
            "slightly",
            "somewhat",
            "barely",
            "hardly",
            "marginally",
            "occasionally",
            "partly",
            "less",
        ] {
            boosters.insert(word, -BOOST_INCREMENT);
        }

        let negations = vec![
            "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere",
            "cannot", "without", "aint", "dont", "cant", "wont", "isnt", "doesnt", "didnt",
            "wasnt", "arent", "shouldnt", "wouldnt", "couldnt", "havent", "hasnt",
        ];

        Self {
            valences,
            boosters,
            negations,
        }
    }

    /// Number of words with a valence.
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    /// True if the lexicon has no valence entries.
    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl Default for DefaultLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentLexicon for DefaultLexicon {
    fn valence(&self, word: &str) -> Option<f64> {
        self.valences.get(word).copied()
    }

    fn booster(&self, word: &str) -> Option<f64> {
        self.boosters.get(word).copied()
    }

    fn is_negation(&self, word: &str) -> bool {
        word.ends_with("n't") || self.negations.contains(&word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_words_have_valence() {
        let lex = DefaultLexicon::new();
        assert!(lex.valence("great").unwrap() > 0.0);
        assert!(lex.valence("terrible").unwrap() < 0.0);
        assert!(lex.valence("table").is_none());
    }

    #[test]
    fn contractions_negate() {
        let lex = DefaultLexicon::new();
        assert!(lex.is_negation("isn't"));
        assert!(lex.is_negation("never"));
        assert!(!lex.is_negation("often"));
    }

    #[test]
    fn boosters_have_sign() {
        let lex = DefaultLexicon::new();
        assert!(lex.booster("very").unwrap() > 0.0);
        assert!(lex.booster("slightly").unwrap() < 0.0);
    }
}
