use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};

use super::{CompletionRecord, Result, SnapshotStore, StoreError};
use crate::snapshot::Snapshot;

fn get_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share\\greek-flashcards")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share/greek-flashcards")
    }
}

pub fn default_db_path() -> PathBuf {
    get_data_dir().join("quiz.db")
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS snapshots (
            session_key TEXT PRIMARY KEY,
            state TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS completions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key TEXT NOT NULL,
            deck_title TEXT NOT NULL,
            started_at INTEGER NOT NULL,
            finished_at INTEGER NOT NULL,
            correct_count INTEGER NOT NULL,
            best_streak INTEGER NOT NULL,
            total_items INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_completions_finished ON completions(finished_at)",
        [],
    )?;

    Ok(())
}

/// Snapshots and completion history in a local SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let conn = self.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT state FROM snapshots WHERE session_key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(raw.and_then(|raw| Snapshot::from_json(&raw)))
    }

    async fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let state = snapshot.to_json()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO snapshots (session_key, state, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(session_key) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
            rusqlite::params![key, state, now()],
        )?;
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM snapshots WHERE session_key = ?", [key])?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM snapshots", [])?;
        conn.execute("DELETE FROM completions", [])?;
        Ok(())
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO completions (session_key, deck_title, started_at, finished_at, correct_count, best_streak, total_items)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                record.session_key,
                record.deck_title,
                record.started_at,
                record.finished_at,
                record.correct_count,
                record.best_streak,
                record.total_items
            ],
        )?;
        Ok(())
    }

    async fn recent_completions(&self, limit: usize) -> Result<Vec<CompletionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT session_key, deck_title, started_at, finished_at, correct_count, best_streak, total_items
             FROM completions ORDER BY finished_at DESC, id DESC LIMIT ?",
        )?;

        let records = stmt
            .query_map([limit as i64], |row| {
                Ok(CompletionRecord {
                    session_key: row.get(0)?,
                    deck_title: row.get(1)?,
                    started_at: row.get(2)?,
                    finished_at: row.get(3)?,
                    correct_count: row.get(4)?,
                    best_streak: row.get(5)?,
                    total_items: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    async fn completed_decks(&self) -> Result<HashSet<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT session_key FROM completions")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(keys)
    }
}
