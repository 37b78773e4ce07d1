//! store::sqlite
//!
//! SQLite-backed post store.
//!
//! # Tables
//!
//! - `posts` - one row per post id; mentions extracted at insert, stored as
//!   a JSON array
//! - `mention_edges` - persisted network, one row per ordered
//!   `(source, target)` pair
//! - `post_sentiment` - latest sentiment per post
//! - `sentiment_summary` - one row per sentiment run

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{InsertReport, PostStore, StoreError};
use crate::core::document::RawPost;
use crate::core::extract::extract_mentions;
use crate::core::network::{CollapsePolicy, Network};
use crate::core::types::{Handle, Post, PostId, PublicMetrics};
use crate::sentiment::{ScoredPost, SentimentCounts};

/// Stored sentiment rows keep at most this many characters of text.
const SENTIMENT_TEXT_LIMIT: usize = 1000;

/// A post store in a SQLite database.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                return Err(StoreError::Missing(parent.to_path_buf()));
            }
        }
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open the store at `path`, failing if it does not exist.
    ///
    /// Readers use this so a mistyped path is an error rather than an
    /// empty store.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        Self::open(path)
    }

    /// Create an in-memory store.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                author TEXT,
                text TEXT NOT NULL DEFAULT '',
                mentions TEXT,
                created_at TEXT,
                lang TEXT,
                metrics TEXT,
                inserted_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS mention_edges (
                source TEXT NOT NULL,
                target TEXT NOT NULL,
                weight INTEGER NOT NULL,
                PRIMARY KEY (source, target)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS post_sentiment (
                post_id TEXT PRIMARY KEY,
                author TEXT NOT NULL,
                text TEXT NOT NULL,
                compound REAL NOT NULL,
                positive REAL NOT NULL,
                neutral REAL NOT NULL,
                negative REAL NOT NULL,
                label TEXT NOT NULL,
                analyzed_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sentiment_summary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                positive INTEGER NOT NULL,
                neutral INTEGER NOT NULL,
                negative INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert raw documents keyed by post id.
    ///
    /// Documents whose id is already stored are left untouched. Documents
    /// without an id are skipped. Mentions are extracted here.
    pub fn insert_posts(&mut self, raws: &[RawPost]) -> Result<InsertReport, StoreError> {
        let mut report = InsertReport::default();
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO posts
                 (id, author, text, mentions, created_at, lang, metrics, inserted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for raw in raws {
                let Some(id) = raw.post_id() else {
                    tracing::warn!("skipping document without an id");
                    report.skipped += 1;
                    continue;
                };

                let author = raw.author_handle().map(String::from);
                let mentions: Vec<String> =
                    extract_mentions(raw).into_iter().map(String::from).collect();
                let mentions = serde_json::to_string(&mentions)
                    .map_err(|e| StoreError::Serialize(e.to_string()))?;
                let metrics = raw
                    .public_metrics
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()
                    .map_err(|e| StoreError::Serialize(e.to_string()))?;

                let changed = stmt.execute(params![
                    id,
                    author,
                    raw.text.as_deref().unwrap_or(""),
                    mentions,
                    raw.created_at,
                    raw.lang,
                    metrics,
                    now,
                ])?;

                if changed == 0 {
                    report.duplicates += 1;
                } else {
                    report.inserted += 1;
                }
            }
        }
        tx.commit()?;

        tracing::debug!(%report, "inserted documents");
        Ok(report)
    }

    /// Number of stored post records, valid or not.
    pub fn post_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Persist a network as one row per ordered pair with the summed weight.
    ///
    /// With `clear`, existing rows are deleted first. Otherwise rows for the
    /// same pair are overwritten and other rows are kept.
    pub fn store_network(&mut self, network: &Network, clear: bool) -> Result<usize, StoreError> {
        let pairs = network.pair_weights();
        let tx = self.conn.transaction()?;
        if clear {
            let removed = tx.execute("DELETE FROM mention_edges", [])?;
            tracing::debug!(removed, "cleared stored edges");
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO mention_edges (source, target, weight)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(source, target) DO UPDATE SET
                    weight = excluded.weight",
            )?;
            for ((source, target), weight) in &pairs {
                let weight = i64::try_from(*weight).unwrap_or(i64::MAX);
                stmt.execute(params![source.as_str(), target.as_str(), weight])?;
            }
        }
        tx.commit()?;
        Ok(pairs.len())
    }

    /// Rebuild a network from the stored edges.
    ///
    /// Stored rows carry no post ids, so edges come back with empty `posts`.
    /// Rows with unusable handles or non-positive weights are skipped.
    pub fn load_network(&self, collapse: CollapsePolicy) -> Result<Network, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT source, target, weight FROM mention_edges ORDER BY source, target")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut network = Network::new(collapse);
        for (source, target, weight) in rows {
            let (Ok(source), Ok(target)) = (Handle::new(source), Handle::new(target)) else {
                tracing::warn!("skipping stored edge with an invalid handle");
                continue;
            };
            let Ok(weight) = u64::try_from(weight) else {
                tracing::warn!(%source, %target, "skipping stored edge with negative weight");
                continue;
            };
            if weight == 0 {
                continue;
            }
            network.insert_edge(source, target, weight, Vec::new());
        }
        Ok(network)
    }

    /// Upsert per-post sentiment.
    pub fn store_sentiments(&mut self, scored: &[ScoredPost]) -> Result<usize, StoreError> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO post_sentiment
                 (post_id, author, text, compound, positive, neutral, negative, label, analyzed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(post_id) DO UPDATE SET
                    author = excluded.author,
                    text = excluded.text,
                    compound = excluded.compound,
                    positive = excluded.positive,
                    neutral = excluded.neutral,
                    negative = excluded.negative,
                    label = excluded.label,
                    analyzed_at = excluded.analyzed_at",
            )?;
            for post in scored {
                let text: String = post.text.chars().take(SENTIMENT_TEXT_LIMIT).collect();
                stmt.execute(params![
                    post.id.as_str(),
                    post.author.as_str(),
                    text,
                    post.scores.compound,
                    post.scores.positive,
                    post.scores.neutral,
                    post.scores.negative,
                    post.label.as_str(),
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(scored.len())
    }

    /// Append a timestamped summary row.
    pub fn store_sentiment_summary(&self, counts: &SentimentCounts) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO sentiment_summary (positive, neutral, negative, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                counts.positive as i64,
                counts.neutral as i64,
                counts.negative as i64,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Label stored for a post, if any.
    pub fn sentiment_label(&self, id: &PostId) -> Result<Option<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT label FROM post_sentiment WHERE post_id = ?1")?;
        let mut rows = stmt.query(params![id.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Number of stored sentiment summaries.
    pub fn sentiment_summary_count(&self) -> Result<usize, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM sentiment_summary", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

/// A stored row before validation.
struct PostRow {
    id: String,
    author: Option<String>,
    text: String,
    mentions: Option<String>,
    created_at: Option<String>,
    lang: Option<String>,
    metrics: Option<String>,
}

impl PostRow {
    fn into_post(self) -> Option<Post> {
        let Ok(id) = PostId::new(self.id) else {
            tracing::warn!("skipping stored post with an empty id");
            return None;
        };
        let Some(author) = self.author.and_then(|a| Handle::new(a).ok()) else {
            tracing::warn!(post = %id, "skipping stored post without an author");
            return None;
        };

        let mentions = match self.mentions.as_deref() {
            None => Vec::new(),
            Some(json) => match serde_json::from_str::<Vec<String>>(json) {
                Ok(names) => names.into_iter().filter_map(|n| Handle::new(n).ok()).collect(),
                Err(e) => {
                    tracing::warn!(post = %id, error = %e, "ignoring unreadable mention list");
                    Vec::new()
                }
            },
        };

        let created_at = self.created_at.as_deref().and_then(|raw| {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => Some(ts.with_timezone(&Utc)),
                Err(e) => {
                    tracing::debug!(post = %id, value = raw, error = %e, "unparseable created_at");
                    None
                }
            }
        });

        let metrics = self
            .metrics
            .as_deref()
            .and_then(|json| serde_json::from_str::<PublicMetrics>(json).ok());

        let mut post = Post::new(id, author, self.text).with_mentions(mentions);
        post.created_at = created_at;
        post.lang = self.lang.filter(|l| !l.trim().is_empty());
        post.metrics = metrics;
        Some(post)
    }
}

impl PostStore for SqliteStore {
    fn fetch_posts(&self, limit: usize) -> Result<Vec<Post>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, author, text, mentions, created_at, lang, metrics
             FROM posts ORDER BY rowid",
        )?;
        let mut rows = stmt.query([])?;

        let mut posts = Vec::new();
        let mut skipped = 0usize;
        while let Some(row) = rows.next()? {
            let record = PostRow {
                id: row.get(0)?,
                author: row.get(1)?,
                text: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                mentions: row.get(3)?,
                created_at: row.get(4)?,
                lang: row.get(5)?,
                metrics: row.get(6)?,
            };
            match record.into_post() {
                Some(post) => posts.push(post),
                None => skipped += 1,
            }
            if limit > 0 && posts.len() >= limit {
                break;
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped malformed stored posts");
        }
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::{build_network, BuildOptions};
    use crate::sentiment::{score_posts, SentimentAnalyzer};

    fn raw(json: &str) -> RawPost {
        serde_json::from_str(json).unwrap()
    }

    fn store_with(docs: &[&str]) -> SqliteStore {
        let mut store = SqliteStore::in_memory().unwrap();
        let raws: Vec<RawPost> = docs.iter().map(|d| raw(d)).collect();
        store.insert_posts(&raws).unwrap();
        store
    }

    #[test]
    fn insert_is_keyed_by_id() {
        let mut store = SqliteStore::in_memory().unwrap();
        let docs = vec![
            raw(r#"{"id": "1", "author": "alice", "text": "hi @bob"}"#),
            raw(r#"{"id": "1", "author": "alice", "text": "changed"}"#),
            raw(r#"{"author": "carol", "text": "no id"}"#),
        ];
        let report = store.insert_posts(&docs).unwrap();

        assert_eq!(
            report,
            InsertReport {
                inserted: 1,
                duplicates: 1,
                skipped: 1
            }
        );
        assert_eq!(store.post_count().unwrap(), 1);
        let posts = store.fetch_posts(0).unwrap();
        assert_eq!(posts[0].text, "hi @bob");
    }

    #[test]
    fn mentions_are_extracted_at_insert() {
        let store = store_with(&[
            r#"{"id": "1", "author": "Alice", "text": "hey @Bob and @bob and @carol",
                "entities": {"mentions": [{"username": "dave"}]}}"#,
        ]);
        let posts = store.fetch_posts(0).unwrap();
        let mentions: Vec<&str> = posts[0].mentions.iter().map(|h| h.as_str()).collect();

        assert_eq!(posts[0].author.as_str(), "alice");
        assert_eq!(mentions, vec!["dave", "bob", "carol"]);
    }

    #[test]
    fn authorless_rows_are_skipped() {
        let store = store_with(&[
            r#"{"id": "1", "text": "nobody wrote this"}"#,
            r#"{"id": "2", "author_id": "42", "text": "hello"}"#,
        ]);
        let posts = store.fetch_posts(0).unwrap();

        assert_eq!(store.post_count().unwrap(), 2);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author.as_str(), "42");
    }

    #[test]
    fn limit_counts_valid_posts() {
        let store = store_with(&[
            r#"{"id": "1", "text": "no author"}"#,
            r#"{"id": "2", "author": "a", "text": "x"}"#,
            r#"{"id": "3", "author": "b", "text": "y"}"#,
        ]);
        let posts = store.fetch_posts(1).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id.as_str(), "2");
    }

    #[test]
    fn created_at_parses_or_becomes_none() {
        let store = store_with(&[
            r#"{"id": "1", "author": "a", "text": "x", "created_at": "2024-03-01T10:00:00.000Z"}"#,
            r#"{"id": "2", "author": "a", "text": "y", "created_at": "yesterday"}"#,
        ]);
        let posts = store.fetch_posts(0).unwrap();
        assert!(posts[0].created_at.is_some());
        assert!(posts[1].created_at.is_none());
    }

    #[test]
    fn network_round_trips_through_edges_table() {
        let mut store = store_with(&[
            r#"{"id": "1", "author": "a", "text": "@b @c"}"#,
            r#"{"id": "2", "author": "a", "text": "@b again"}"#,
        ]);
        let posts = store.fetch_posts(0).unwrap();
        let network = build_network(&posts, BuildOptions::default());

        assert_eq!(store.store_network(&network, false).unwrap(), 2);
        let loaded = store.load_network(CollapsePolicy::Weighted).unwrap();

        assert_eq!(loaded.pair_weights(), network.pair_weights());
    }

    #[test]
    fn store_network_upserts_and_clears() {
        let mut store = SqliteStore::in_memory().unwrap();
        let a = Handle::new("a").unwrap();
        let b = Handle::new("b").unwrap();
        let c = Handle::new("c").unwrap();

        let mut first = Network::new(CollapsePolicy::Weighted);
        first.insert_edge(a.clone(), b.clone(), 1, Vec::new());
        first.insert_edge(a.clone(), c.clone(), 1, Vec::new());
        store.store_network(&first, false).unwrap();

        let mut second = Network::new(CollapsePolicy::Weighted);
        second.insert_edge(a.clone(), b.clone(), 5, Vec::new());
        store.store_network(&second, false).unwrap();

        let merged = store.load_network(CollapsePolicy::Weighted).unwrap();
        assert_eq!(merged.edge_weight(&a, &b), 5);
        assert_eq!(merged.edge_weight(&a, &c), 1);

        store.store_network(&second, true).unwrap();
        let cleared = store.load_network(CollapsePolicy::Weighted).unwrap();
        assert_eq!(cleared.edge_count(), 1);
    }

    #[test]
    fn underscore_handles_keep_distinct_edges() {
        let mut store = SqliteStore::in_memory().unwrap();
        let h = |s: &str| Handle::new(s).unwrap();

        let mut network = Network::new(CollapsePolicy::Weighted);
        network.insert_edge(h("a_"), h("b"), 3, Vec::new());
        network.insert_edge(h("a"), h("_b"), 5, Vec::new());
        network.insert_edge(h("a__"), h("_"), 2, Vec::new());

        assert_eq!(store.store_network(&network, true).unwrap(), 3);
        let loaded = store.load_network(CollapsePolicy::Weighted).unwrap();

        assert_eq!(loaded.pair_weights(), network.pair_weights());
        assert_eq!(loaded.edge_weight(&h("a_"), &h("b")), 3);
        assert_eq!(loaded.edge_weight(&h("a"), &h("_b")), 5);
    }

    #[test]
    fn sentiments_upsert_by_post_id() {
        let mut store = store_with(&[r#"{"id": "1", "author": "a", "text": "great stuff"}"#]);
        let posts = store.fetch_posts(0).unwrap();
        let (scored, counts) = score_posts(&SentimentAnalyzer::new(), &posts);

        store.store_sentiments(&scored).unwrap();
        store.store_sentiments(&scored).unwrap();
        store.store_sentiment_summary(&counts).unwrap();

        let id = PostId::new("1").unwrap();
        assert_eq!(store.sentiment_label(&id).unwrap().as_deref(), Some("positive"));
        assert_eq!(store.sentiment_summary_count().unwrap(), 1);
    }

    #[test]
    fn open_existing_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        assert!(matches!(
            SqliteStore::open_existing(&path),
            Err(StoreError::Missing(_))
        ));

        SqliteStore::open(&path).unwrap();
        assert!(SqliteStore::open_existing(&path).is_ok());
    }
}
