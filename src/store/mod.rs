//! Persistence of quiz snapshots, keyed by deck.
//!
//! The engine never talks to a store directly: the UI loads a snapshot when a
//! session starts and hands save/clear requests to the persistence worker.
//! Every failure here is recoverable, the caller keeps the in-memory session.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::snapshot::Snapshot;

pub mod memory;
pub mod remote;
pub mod sqlite;

pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store connection poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One finished session, kept for the history panel.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRecord {
    pub session_key: String,
    pub deck_title: String,
    /// Unix seconds.
    pub started_at: u64,
    pub finished_at: u64,
    pub correct_count: u32,
    pub best_streak: u32,
    pub total_items: usize,
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when there is no usable saved session for `key`.
    async fn load(&self, key: &str) -> Result<Option<Snapshot>>;

    async fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()>;

    async fn clear(&self, key: &str) -> Result<()>;

    /// Forgets every saved session, and the completion history where the
    /// store keeps one.
    async fn clear_all(&self) -> Result<()>;

    async fn record_completion(&self, _record: &CompletionRecord) -> Result<()> {
        Ok(())
    }

    /// Most recent first.
    async fn recent_completions(&self, _limit: usize) -> Result<Vec<CompletionRecord>> {
        Ok(Vec::new())
    }

    /// Keys of every deck completed at least once, regardless of how old
    /// the completion is.
    async fn completed_decks(&self) -> Result<HashSet<String>> {
        Ok(HashSet::new())
    }
}
