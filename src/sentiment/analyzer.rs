//! sentiment::analyzer
//!
//! Rule-based polarity scoring over a [`SentimentLexicon`].
//!
//! Each sentiment-bearing token contributes its valence, adjusted by:
//!
//! - boosters in the three preceding tokens (dampened with distance)
//! - ALL-CAPS emphasis when the rest of the text is not shouted
//! - negation in the three preceding tokens (flips and shrinks the valence)
//! - a contrastive "but" (halves what precedes it, amplifies what follows)
//!
//! Exclamation marks add emphasis in the direction of the total. The total
//! is normalized into a compound score in [-1, 1].

use super::lexicon::{DefaultLexicon, SentimentLexicon, BOOST_INCREMENT};

/// Normalization constant for the compound score.
const NORMALIZE_ALPHA: f64 = 15.0;

/// Multiplier applied to a negated valence.
const NEGATION_SCALAR: f64 = -0.74;

/// Added to a shouted word's magnitude.
const CAPS_INCREMENT: f64 = 0.733;

/// Emphasis added per exclamation mark.
const EXCLAMATION_INCREMENT: f64 = 0.292;

/// Exclamation marks beyond this count add nothing.
const MAX_EXCLAMATIONS: usize = 4;

/// How far back boosters and negations reach.
const LOOKBACK: usize = 3;

/// Polarity scores for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scores {
    /// Normalized overall score in [-1, 1]
    pub compound: f64,
    /// Proportion of positive signal
    pub positive: f64,
    /// Proportion of neutral tokens
    pub neutral: f64,
    /// Proportion of negative signal
    pub negative: f64,
}

/// Scores text against a lexicon.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer<L = DefaultLexicon> {
    lexicon: L,
}

impl SentimentAnalyzer<DefaultLexicon> {
    /// Create an analyzer over the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: DefaultLexicon::new(),
        }
    }
}

impl Default for SentimentAnalyzer<DefaultLexicon> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: SentimentLexicon> SentimentAnalyzer<L> {
    /// Create an analyzer over a custom lexicon.
    pub fn with_lexicon(lexicon: L) -> Self {
        Self { lexicon }
    }

    /// Score a text.
    ///
    /// Text with no sentiment-bearing words scores zero.
    pub fn polarity_scores(&self, text: &str) -> Scores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Scores::default();
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let shouting = is_shouting(&tokens);

        let mut sentiments: Vec<f64> = Vec::with_capacity(tokens.len());
        for (i, word) in lowered.iter().enumerate() {
            if self.lexicon.booster(word).is_some() {
                sentiments.push(0.0);
                continue;
            }
            let Some(base) = self.lexicon.valence(word) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = base;
            if !shouting && is_all_caps(&tokens[i]) {
                valence += CAPS_INCREMENT * valence.signum();
            }

            for distance in 1..=LOOKBACK.min(i) {
                let prev = &lowered[i - distance];
                if let Some(boost) = self.lexicon.booster(prev) {
                    let damp = 1.0 - 0.05 * (distance as f64 - 1.0);
                    valence += boost * valence.signum() * damp;
                }
            }

            if (1..=LOOKBACK.min(i)).any(|d| self.lexicon.is_negation(&lowered[i - d])) {
                valence *= NEGATION_SCALAR;
            }

            sentiments.push(valence);
        }

        if let Some(but) = lowered.iter().position(|w| w == "but") {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < but {
                    *s *= 0.5;
                } else if i > but {
                    *s *= 1.5;
                }
            }
        }

        let mut sum: f64 = sentiments.iter().sum();
        if sum != 0.0 {
            let bangs = text.chars().filter(|c| *c == '!').count().min(MAX_EXCLAMATIONS);
            sum += bangs as f64 * EXCLAMATION_INCREMENT * sum.signum();
        }

        let (mut pos, mut neg, mut neu) = (0.0, 0.0, 0.0);
        for s in &sentiments {
            if *s > 0.0 {
                pos += s + 1.0;
            } else if *s < 0.0 {
                neg += s - 1.0;
            } else {
                neu += 1.0;
            }
        }
        let total = pos + neg.abs() + neu;

        Scores {
            compound: normalize(sum),
            positive: round3(pos / total),
            neutral: round3(neu / total),
            negative: round3(neg.abs() / total),
        }
    }
}

/// Map an unbounded sum into [-1, 1].
pub fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Split on whitespace and strip surrounding punctuation, keeping inner
/// apostrophes so contractions survive.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

fn is_shouting(tokens: &[String]) -> bool {
    tokens.iter().all(|t| is_all_caps(t) || !t.chars().any(char::is_alphabetic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(text: &str) -> f64 {
        SentimentAnalyzer::new().polarity_scores(text).compound
    }

    #[test]
    fn positive_text_scores_positive() {
        assert!(compound("I love this, it is great") > 0.5);
    }

    #[test]
    fn negative_text_scores_negative() {
        assert!(compound("this is terrible and I hate it") < -0.5);
    }

    #[test]
    fn neutral_text_scores_zero() {
        let scores = SentimentAnalyzer::new().polarity_scores("the meeting is at noon");
        assert_eq!(scores.compound, 0.0);
        assert_eq!(scores.neutral, 1.0);
    }

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(SentimentAnalyzer::new().polarity_scores(""), Scores::default());
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(compound("good") > 0.0);
        assert!(compound("not good") < 0.0);
        assert!(compound("this isn't good") < 0.0);
    }

    #[test]
    fn boosters_intensify() {
        assert!(compound("very good") > compound("good"));
        assert!(compound("slightly good") < compound("good"));
    }

    #[test]
    fn caps_and_exclamations_intensify() {
        assert!(compound("this is GOOD") > compound("this is good"));
        assert!(compound("good!!!") > compound("good"));
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        assert!(compound("the demo was good but the pricing is terrible") < 0.0);
    }

    #[test]
    fn proportions_sum_to_one() {
        let s = SentimentAnalyzer::new().polarity_scores("great tool but some problems remain");
        let total = s.positive + s.neutral + s.negative;
        assert!((total - 1.0).abs() < 0.01);
    }

    #[test]
    fn compound_is_bounded() {
        let text = "love love love great great awesome best amazing!!!!";
        let c = compound(text);
        assert!(c > 0.9 && c <= 1.0);
    }
}
