//! core::extract
//!
//! Mention, hashtag, and word extraction from post text.
//!
//! Mentions are extracted once, at ingest, and stored with the post. The
//! network builder consumes the stored list as-is.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::document::{normalize_username, RawPost};
use super::types::Handle;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]{1,15})").expect("valid mention regex"));
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("valid hashtag regex"));
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("valid word regex"));

/// Find `@handle` mentions in free text, normalized, in order of appearance.
///
/// Duplicates are kept.
pub fn text_mentions(text: &str) -> Vec<Handle> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| normalize_username(m.as_str()))
        .collect()
}

/// Extract the mention list for a raw post.
///
/// Structured mention entities come first, then `@handle` matches from the
/// text. Each target appears at most once per post.
///
/// # Example
///
/// ```
/// use chirpgraph::core::document::RawPost;
/// use chirpgraph::core::extract::extract_mentions;
///
/// let raw = RawPost {
///     text: Some("thanks @Bob and @bob, cc @carol".into()),
///     ..Default::default()
/// };
/// let mentions: Vec<String> = extract_mentions(&raw)
///     .into_iter()
///     .map(String::from)
///     .collect();
/// assert_eq!(mentions, vec!["bob", "carol"]);
/// ```
pub fn extract_mentions(raw: &RawPost) -> Vec<Handle> {
    let mut seen = HashSet::new();
    let mut mentions = Vec::new();

    let structured = raw.structured_mentions().iter().filter_map(|m| m.handle());
    let from_text = raw.text.as_deref().map(text_mentions).unwrap_or_default();

    for handle in structured.chain(from_text) {
        if seen.insert(handle.clone()) {
            mentions.push(handle);
        }
    }

    mentions
}

/// Find `#hashtags` in text, lowercased, duplicates kept.
pub fn hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Split text into lowercased alphabetic words.
pub fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::{RawEntities, RawMention};

    fn names(handles: Vec<Handle>) -> Vec<String> {
        handles.into_iter().map(String::from).collect()
    }

    #[test]
    fn text_mentions_keep_duplicates() {
        assert_eq!(names(text_mentions("@a @B @a")), vec!["a", "b", "a"]);
    }

    #[test]
    fn text_mentions_cap_length() {
        // Handles are at most 15 characters; longer runs are truncated by the pattern.
        let found = names(text_mentions("@abcdefghijklmnopq"));
        assert_eq!(found, vec!["abcdefghijklmno"]);
    }

    #[test]
    fn structured_mentions_come_first() {
        let raw = RawPost {
            text: Some("hi @zed".into()),
            entities: Some(RawEntities {
                mentions: vec![RawMention {
                    username: Some("Amy".into()),
                    ..Default::default()
                }],
                hashtags: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(names(extract_mentions(&raw)), vec!["amy", "zed"]);
    }

    #[test]
    fn structured_and_text_are_deduplicated() {
        let raw = RawPost {
            text: Some("hi @Amy".into()),
            entities: Some(RawEntities {
                mentions: vec![RawMention {
                    username: Some("amy".into()),
                    ..Default::default()
                }],
                hashtags: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(names(extract_mentions(&raw)), vec!["amy"]);
    }

    #[test]
    fn no_text_no_mentions() {
        assert!(extract_mentions(&RawPost::default()).is_empty());
    }

    #[test]
    fn hashtags_lowercased() {
        assert_eq!(hashtags("#GenAI and #rust_lang #GenAI"), vec!["genai", "rust_lang", "genai"]);
    }

    #[test]
    fn words_are_alphabetic() {
        assert_eq!(words("Rust 2024 is GREAT!"), vec!["rust", "is", "great"]);
    }
}
