//! source
//!
//! Post sources: remote search APIs that supply raw post documents.
//!
//! # Architecture
//!
//! The [`PostSource`] trait is async because sources perform network I/O.
//! [`collect_posts`] drives paging over any source; commands never page by
//! hand.
//!
//! # Modules
//!
//! - [`twitter`]: Twitter v2 recent search
//! - [`mock`]: Scripted source for deterministic testing
//!
//! # Example
//!
//! ```
//! use chirpgraph::core::document::RawPost;
//! use chirpgraph::source::mock::MockSource;
//! use chirpgraph::source::{collect_posts, SearchPage};
//!
//! # tokio_test::block_on(async {
//! let source = MockSource::new(vec![SearchPage {
//!     posts: vec![RawPost { id: Some("1".into()), ..Default::default() }],
//!     next_token: None,
//! }]);
//!
//! let posts = collect_posts(&source, "rust", 10).await.unwrap();
//! assert_eq!(posts.len(), 1);
//! # });
//! ```

pub mod mock;
pub mod twitter;

pub use twitter::TwitterClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::document::RawPost;

/// Smallest page size the search endpoint accepts.
pub const MIN_PAGE_SIZE: u32 = 10;

/// Largest page size the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors from post source operations.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// No credentials were configured.
    #[error("authentication required: set TWITTER_BEARER_TOKEN or [twitter] bearer_token")]
    AuthRequired,

    /// Credentials were rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// One search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search query in the source's syntax
    pub query: String,
    /// Requested page size, already clamped
    pub max_results: u32,
    /// Continuation token from the previous page
    pub next_token: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Raw documents on this page
    pub posts: Vec<RawPost>,
    /// Token for the next page, `None` on the last page
    pub next_token: Option<String>,
}

/// A searchable source of raw posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Fetch one page of recent posts.
    async fn search_recent(&self, request: SearchRequest) -> Result<SearchPage, SourceError>;
}

/// Clamp a wanted page size to what the endpoint accepts.
pub fn page_size(wanted: usize) -> u32 {
    let wanted = u32::try_from(wanted).unwrap_or(MAX_PAGE_SIZE);
    wanted.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// Collect up to `limit` posts matching `query`.
///
/// Pages until `limit` posts are collected, a page comes back empty, or
/// there is no next token. The result is truncated to `limit`.
///
/// An error before any post was collected is returned. An error after that
/// stops collection and returns what was already collected.
pub async fn collect_posts(
    source: &dyn PostSource,
    query: &str,
    limit: usize,
) -> Result<Vec<RawPost>, SourceError> {
    let mut posts: Vec<RawPost> = Vec::new();
    let mut next_token: Option<String> = None;

    while posts.len() < limit {
        let request = SearchRequest {
            query: query.to_string(),
            max_results: page_size(limit - posts.len()),
            next_token: next_token.take(),
        };

        let page = match source.search_recent(request).await {
            Ok(page) => page,
            Err(err) if posts.is_empty() => return Err(err),
            Err(err) => {
                tracing::warn!(
                    source = source.name(),
                    error = %err,
                    collected = posts.len(),
                    "stopping collection early"
                );
                break;
            }
        };

        if page.posts.is_empty() {
            tracing::info!(source = source.name(), "no more posts returned");
            break;
        }

        let fetched = page.posts.len();
        posts.extend(page.posts);
        tracing::info!(fetched, total = posts.len(), "fetched page");

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    posts.truncate(limit);
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(page_size(1), MIN_PAGE_SIZE);
        assert_eq!(page_size(55), 55);
        assert_eq!(page_size(1000), MAX_PAGE_SIZE);
        assert_eq!(page_size(usize::MAX), MAX_PAGE_SIZE);
    }

    #[test]
    fn error_messages() {
        let err = SourceError::ApiError {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error: 503 - Service Unavailable");
        assert_eq!(SourceError::RateLimited.to_string(), "rate limited");
    }
}
