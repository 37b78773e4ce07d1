//! core::document
//!
//! Raw post documents as received from a source or an import file.
//!
//! # Design
//!
//! Sources return loosely-typed documents: any field may be missing and ids
//! may arrive as strings or numbers. `RawPost` accepts all of that. It is
//! turned into a stored record by [`crate::store`] (which extracts mentions
//! at ingest) and into a validated [`Post`](super::types::Post) when read
//! back.
//!
//! This is the only place handle normalization happens: usernames are
//! trimmed, stripped of a leading `@`, and lowercased.

use serde::{Deserialize, Deserializer, Serialize};

use super::types::{Handle, PublicMetrics};

/// A raw post document.
///
/// Field names follow the Twitter v2 tweet object so API responses and
/// exported documents deserialize directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPost {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub author_id: Option<String>,
    /// Author username, when the source resolved it.
    pub author: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub lang: Option<String>,
    pub public_metrics: Option<PublicMetrics>,
    pub entities: Option<RawEntities>,
}

/// Structured entities attached to a raw post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEntities {
    pub mentions: Vec<RawMention>,
    pub hashtags: Vec<RawHashtag>,
}

/// A structured mention entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMention {
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub username: Option<String>,
    /// v1.1 spelling of `username`.
    pub screen_name: Option<String>,
}

/// A structured hashtag entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHashtag {
    pub tag: Option<String>,
}

impl RawPost {
    /// The post id, if present and non-blank.
    pub fn post_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Resolve the author handle.
    ///
    /// Prefers the username (normalized); falls back to the raw author id.
    pub fn author_handle(&self) -> Option<Handle> {
        if let Some(handle) = self.author.as_deref().and_then(normalize_username) {
            return Some(handle);
        }
        self.author_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(|id| Handle::new(id).ok())
    }

    /// The structured mention entities, empty when absent.
    pub fn structured_mentions(&self) -> &[RawMention] {
        self.entities
            .as_ref()
            .map(|e| e.mentions.as_slice())
            .unwrap_or(&[])
    }
}

impl RawMention {
    /// Resolve this mention to a handle: username first, then id.
    pub fn handle(&self) -> Option<Handle> {
        self.username
            .as_deref()
            .or(self.screen_name.as_deref())
            .and_then(normalize_username)
            .or_else(|| {
                self.id
                    .as_deref()
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .and_then(|id| Handle::new(id).ok())
            })
    }
}

/// Normalize a username into a handle.
///
/// Trims whitespace, strips one leading `@`, and lowercases. Returns `None`
/// if nothing usable remains.
///
/// # Example
///
/// ```
/// use chirpgraph::core::document::normalize_username;
///
/// assert_eq!(normalize_username(" @RustLang ").unwrap().as_str(), "rustlang");
/// assert!(normalize_username("@").is_none());
/// ```
pub fn normalize_username(name: &str) -> Option<Handle> {
    let trimmed = name.trim();
    let stripped = trimmed.strip_prefix('@').unwrap_or(trimmed);
    Handle::new(stripped.to_lowercase()).ok()
}

/// Accept a JSON string or number (or null) as an optional string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
