//! store
//!
//! The post store: where collected posts live between runs.
//!
//! # Architecture
//!
//! Consumers depend on the [`PostStore`] trait, which only exposes reads.
//! [`SqliteStore`] is the persistent implementation used by the CLI; it also
//! owns ingest (raw documents in) and the side tables for persisted networks
//! and sentiment results. [`MemoryStore`] backs tests and library callers
//! that already hold posts in memory.
//!
//! # Validation boundary
//!
//! Stored records are loosely typed. They become [`Post`] values only when
//! read: records with no author or no id are skipped with a warning and
//! never abort the read; a missing mention list reads as empty.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Post;

/// Errors from post store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file does not exist.
    #[error("post store not found: {0}")]
    Missing(PathBuf),

    /// The store could not be opened.
    #[error("failed to open post store '{path}': {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// A query failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record could not be serialized for storage.
    #[error("failed to serialize record: {0}")]
    Serialize(String),
}

/// Read access to stored posts.
pub trait PostStore {
    /// Fetch up to `limit` valid posts in insertion order; `0` means all.
    ///
    /// Malformed records are skipped, not reported as errors.
    fn fetch_posts(&self, limit: usize) -> Result<Vec<Post>, StoreError>;
}

/// Outcome of an ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    /// New records written
    pub inserted: usize,
    /// Records whose id was already stored
    pub duplicates: usize,
    /// Records rejected for lacking an id
    pub skipped: usize,
}

impl std::fmt::Display for InsertReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} inserted, {} duplicates, {} skipped",
            self.inserted, self.duplicates, self.skipped
        )
    }
}
