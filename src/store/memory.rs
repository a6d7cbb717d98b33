use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionRecord, Result, SnapshotStore, StoreError};
use crate::snapshot::Snapshot;

/// Keeps snapshots for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, Snapshot>>,
    completions: Mutex<Vec<CompletionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, key: &str) -> Result<Option<Snapshot>> {
        let snapshots = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(snapshots.get(key).filter(|s| s.is_resumable()).cloned())
    }

    async fn save(&self, key: &str, snapshot: &Snapshot) -> Result<()> {
        let mut snapshots = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        snapshots.insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let mut snapshots = self.snapshots.lock().map_err(|_| StoreError::Poisoned)?;
        snapshots.remove(key);
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.snapshots
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        self.completions
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .clear();
        Ok(())
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<()> {
        let mut completions = self.completions.lock().map_err(|_| StoreError::Poisoned)?;
        completions.push(record.clone());
        Ok(())
    }

    async fn recent_completions(&self, limit: usize) -> Result<Vec<CompletionRecord>> {
        let completions = self.completions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(completions.iter().rev().take(limit).cloned().collect())
    }

    async fn completed_decks(&self) -> Result<HashSet<String>> {
        let completions = self.completions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(completions.iter().map(|r| r.session_key.clone()).collect())
    }
}
