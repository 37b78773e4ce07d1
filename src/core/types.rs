//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Handle`] - User handle (author or mention target)
//! - [`PostId`] - Opaque post identifier
//! - [`Post`] - A validated, stored post
//! - [`PublicMetrics`] - Engagement counters reported by the source
//!
//! # Validation
//!
//! These types enforce validity at construction time. A `Post` can only be
//! built from a non-empty id and a non-empty author, so the network builder
//! never has to reason about malformed records.
//!
//! # Examples
//!
//! ```
//! use chirpgraph::core::types::{Handle, PostId};
//!
//! let handle = Handle::new("rustlang").unwrap();
//! assert_eq!(handle.as_str(), "rustlang");
//!
//! // Empty values are rejected at creation time
//! assert!(Handle::new("").is_err());
//! assert!(PostId::new("").is_err());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("invalid post id: {0}")]
    InvalidPostId(String),
}

/// A user handle.
///
/// Handles compare by exact string equality. No case folding or `@`
/// stripping happens here; whoever produces handles is responsible for
/// normalizing them.
///
/// # Example
///
/// ```
/// use chirpgraph::core::types::Handle;
///
/// let a = Handle::new("Alice").unwrap();
/// let b = Handle::new("alice").unwrap();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Create a new handle.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidHandle` if the handle is empty or contains
    /// whitespace or control characters.
    pub fn new(handle: impl Into<String>) -> Result<Self, TypeError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(TypeError::InvalidHandle("handle cannot be empty".into()));
        }
        if handle.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidHandle(format!(
                "handle cannot contain whitespace: {:?}",
                handle
            )));
        }
        Ok(Self(handle))
    }

    /// Get the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Handle {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An opaque post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

impl PostId {
    /// Create a new post id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPostId` if the id is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TypeError::InvalidPostId("post id cannot be empty".into()));
        }
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PostId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engagement counters attached to a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicMetrics {
    pub retweet_count: u64,
    pub reply_count: u64,
    pub like_count: u64,
    pub quote_count: u64,
}

impl PublicMetrics {
    /// Sum of all engagement counters.
    pub fn engagement(&self) -> u64 {
        self.retweet_count
            .saturating_add(self.reply_count)
            .saturating_add(self.like_count)
            .saturating_add(self.quote_count)
    }
}

/// A collected post, validated at the store boundary.
///
/// `mentions` keeps the order the producer gave it and may contain
/// duplicates. Posts are immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author: Handle,
    pub text: String,
    #[serde(default)]
    pub mentions: Vec<Handle>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub metrics: Option<PublicMetrics>,
}

impl Post {
    /// Create a post with the required fields; optional fields start empty.
    pub fn new(id: PostId, author: Handle, text: impl Into<String>) -> Self {
        Self {
            id,
            author,
            text: text.into(),
            mentions: Vec::new(),
            created_at: None,
            lang: None,
            metrics: None,
        }
    }

    /// Set the mentioned handles.
    pub fn with_mentions(mut self, mentions: Vec<Handle>) -> Self {
        self.mentions = mentions;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Engagement score, zero when the source reported no metrics.
    pub fn engagement(&self) -> u64 {
        self.metrics.map(|m| m.engagement()).unwrap_or(0)
    }
}
