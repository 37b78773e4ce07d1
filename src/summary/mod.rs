//! summary
//!
//! Plain-text digest of a set of posts: volume, time span, top hashtags,
//! mentions and words, language mix, and the most engaging posts.

mod stopwords;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::core::extract;
use crate::core::types::Post;

pub use stopwords::is_stopword;

/// Hashtags listed.
pub const TOP_HASHTAGS: usize = 20;

/// Mentions listed.
pub const TOP_MENTIONS: usize = 20;

/// Words listed.
pub const TOP_WORDS: usize = 30;

/// Languages listed.
pub const TOP_LANGUAGES: usize = 20;

/// Longest excerpt, in characters.
pub const EXCERPT_LIMIT: usize = 240;

/// A ranked `(key, count)` list.
pub type Ranking = Vec<(String, usize)>;

/// A post picked as representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representative {
    pub id: String,
    pub author: String,
    pub engagement: u64,
    /// Text length in characters
    pub length: usize,
    pub excerpt: String,
}

/// Digest of a set of posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub span: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub hashtags: Ranking,
    pub mentions: Ranking,
    pub words: Ranking,
    pub languages: Ranking,
    pub representatives: Vec<Representative>,
}

impl Summary {
    /// True if no posts were summarized.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Summarize `posts`, keeping `top` representative posts.
pub fn summarize(posts: &[Post], top: usize) -> Summary {
    if posts.is_empty() {
        return Summary::default();
    }

    let mut hashtags: HashMap<String, usize> = HashMap::new();
    let mut mentions: HashMap<String, usize> = HashMap::new();
    let mut words: HashMap<String, usize> = HashMap::new();
    let mut languages: HashMap<String, usize> = HashMap::new();
    let mut span: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

    for post in posts {
        if let Some(ts) = post.created_at {
            span = Some(match span {
                None => (ts, ts),
                Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
            });
        }
        for tag in extract::hashtags(&post.text) {
            *hashtags.entry(tag).or_insert(0) += 1;
        }
        for handle in &post.mentions {
            *mentions.entry(handle.to_string()).or_insert(0) += 1;
        }
        for word in extract::words(&post.text) {
            if !is_stopword(&word) {
                *words.entry(word).or_insert(0) += 1;
            }
        }
        if let Some(lang) = post.lang.as_deref().filter(|l| !l.is_empty()) {
            *languages.entry(lang.to_string()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by(|a, b| {
        b.engagement()
            .cmp(&a.engagement())
            .then_with(|| b.text.chars().count().cmp(&a.text.chars().count()))
    });
    let representatives = ranked
        .into_iter()
        .take(top)
        .map(|post| Representative {
            id: post.id.to_string(),
            author: post.author.to_string(),
            engagement: post.engagement(),
            length: post.text.chars().count(),
            excerpt: excerpt(&post.text),
        })
        .collect();

    Summary {
        total: posts.len(),
        span,
        hashtags: most_common(hashtags, TOP_HASHTAGS),
        mentions: most_common(mentions, TOP_MENTIONS),
        words: most_common(words, TOP_WORDS),
        languages: most_common(languages, TOP_LANGUAGES),
        representatives,
    }
}

/// Top `n` entries by count desc, then key asc.
fn most_common(counts: HashMap<String, usize>, n: usize) -> Ranking {
    let mut entries: Ranking = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

/// Flatten newlines and cut to [`EXCERPT_LIMIT`] characters.
pub fn excerpt(text: &str) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    if flat.chars().count() <= EXCERPT_LIMIT {
        return flat;
    }
    let mut cut: String = flat.chars().take(EXCERPT_LIMIT - 3).collect();
    cut.push_str("...");
    cut
}

fn write_ranking(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    prefix: &str,
    ranking: &Ranking,
    empty: &str,
) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    if ranking.is_empty() {
        writeln!(f, "  {}", empty)?;
    }
    for (key, count) in ranking {
        writeln!(f, "  {}{}: {}", prefix, key, count)?;
    }
    writeln!(f)
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Post summary for {} posts", self.total)?;
        if let Some((first, last)) = self.span {
            writeln!(
                f,
                "Time span: {} to {}",
                first.to_rfc3339_opts(SecondsFormat::Secs, true),
                last.to_rfc3339_opts(SecondsFormat::Secs, true)
            )?;
        }
        writeln!(f)?;

        write_ranking(f, "Top hashtags", "#", &self.hashtags, "(none)")?;
        write_ranking(f, "Top mentions", "@", &self.mentions, "(none)")?;
        write_ranking(f, "Top words", "", &self.words, "(none)")?;
        write_ranking(f, "Language distribution", "", &self.languages, "(unknown)")?;

        writeln!(f, "Representative posts:")?;
        for rep in &self.representatives {
            writeln!(
                f,
                "- id={} author={} engagement={} len={}",
                rep.id, rep.author, rep.engagement, rep.length
            )?;
            writeln!(f, "  {}", rep.excerpt)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Handle, PostId, PublicMetrics};

    fn post(id: &str, text: &str, likes: u64) -> Post {
        let mut p = Post::new(PostId::new(id).unwrap(), Handle::new("alice").unwrap(), text);
        p.metrics = Some(PublicMetrics {
            like_count: likes,
            ..Default::default()
        });
        p
    }

    #[test]
    fn empty_input_is_empty_summary() {
        let summary = summarize(&[], 5);
        assert!(summary.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn counts_hashtags_words_and_mentions() {
        let posts = vec![
            post("1", "Generative AI is #AI magic #ml", 0)
                .with_mentions(vec![Handle::new("bob").unwrap()]),
            post("2", "the #ai wave and the models", 0)
                .with_mentions(vec![Handle::new("bob").unwrap(), Handle::new("carol").unwrap()]),
        ];
        let summary = summarize(&posts, 5);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.hashtags[0], ("ai".to_string(), 2));
        assert_eq!(summary.hashtags[1], ("ml".to_string(), 1));
        assert_eq!(summary.mentions[0], ("bob".to_string(), 2));
        assert!(summary.words.iter().all(|(w, _)| w != "the" && w != "is"));
        assert!(summary.words.contains(&("ai".to_string(), 3)));
    }

    #[test]
    fn representatives_rank_by_engagement_then_length() {
        let posts = vec![
            post("short", "hi", 5),
            post("long", "a much longer post", 5),
            post("popular", "x", 50),
        ];
        let summary = summarize(&posts, 2);
        let ids: Vec<&str> = summary.representatives.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["popular", "long"]);
    }

    #[test]
    fn excerpt_truncates_and_flattens() {
        assert_eq!(excerpt("line one\nline two"), "line one line two");
        let long = "x".repeat(300);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_LIMIT);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt(&"y".repeat(240)).len(), 240);
    }

    #[test]
    fn renders_placeholders() {
        let summary = summarize(&[post("1", "plain words only", 0)], 1);
        let text = summary.to_string();
        assert!(text.starts_with("Post summary for 1 posts"));
        assert!(text.contains("Top hashtags:\n  (none)"));
        assert!(text.contains("Language distribution:\n  (unknown)"));
        assert!(text.contains("- id=1 author=alice engagement=0 len=16"));
    }

    #[test]
    fn time_span_skips_missing_timestamps() {
        let early = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let late = "2024-02-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let posts = vec![
            post("1", "a", 0).with_created_at(late),
            post("2", "b", 0),
            post("3", "c", 0).with_created_at(early),
        ];
        let summary = summarize(&posts, 0);
        assert_eq!(summary.span, Some((early, late)));
        assert!(summary
            .to_string()
            .contains("Time span: 2024-01-01T00:00:00Z to 2024-02-01T00:00:00Z"));
    }
}
