//! store::memory
//!
//! In-memory post store.

use super::{PostStore, StoreError};
use crate::core::types::Post;

/// A post store backed by a vector.
///
/// # Example
///
/// ```
/// use chirpgraph::core::types::{Handle, Post, PostId};
/// use chirpgraph::store::{MemoryStore, PostStore};
///
/// let store = MemoryStore::new(vec![
///     Post::new(PostId::new("1").unwrap(), Handle::new("a").unwrap(), "first"),
///     Post::new(PostId::new("2").unwrap(), Handle::new("b").unwrap(), "second"),
/// ]);
///
/// assert_eq!(store.fetch_posts(1).unwrap().len(), 1);
/// assert_eq!(store.fetch_posts(0).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    posts: Vec<Post>,
}

impl MemoryStore {
    /// Create a store holding `posts`.
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Append a post.
    pub fn push(&mut self, post: Post) {
        self.posts.push(post);
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// True if no posts are stored.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl PostStore for MemoryStore {
    fn fetch_posts(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        let take = if limit == 0 { self.posts.len() } else { limit };
        Ok(self.posts.iter().take(take).cloned().collect())
    }
}
