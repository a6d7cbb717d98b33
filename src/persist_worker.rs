use crate::snapshot::Snapshot;
use crate::store::{CompletionRecord, SnapshotStore};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

#[derive(Debug, Clone, PartialEq)]
pub enum PersistRequest {
    Save { key: String, snapshot: Snapshot },
    Clear { key: String },
    ClearAll,
    RecordCompletion(CompletionRecord),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersistEvent {
    Saved { key: String },
    Cleared { key: String },
    ClearedAll,
    Recorded { key: String },
    Failed { action: &'static str, error: String },
}

/// Runs store calls off the UI thread. Failures come back as
/// `PersistEvent::Failed`; the session carries on in memory either way.
pub fn spawn_persist_worker(
    store: Arc<dyn SnapshotStore>,
    event_tx: Sender<PersistEvent>,
    request_rx: Receiver<PersistRequest>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("greek-flashcards::persist_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("Persist worker could not start a runtime: {}", e);
                    return;
                }
            };

            while let Ok(request) = request_rx.recv() {
                let event = rt.block_on(handle_request(store.as_ref(), request));
                if let PersistEvent::Failed { action, error } = &event {
                    tracing::warn!("{} failed on {} store: {}", action, store.name(), error);
                }
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            tracing::debug!("Persist worker channel disconnected, exiting");
        })
}

pub async fn handle_request(store: &dyn SnapshotStore, request: PersistRequest) -> PersistEvent {
    match request {
        PersistRequest::Save { key, snapshot } => match store.save(&key, &snapshot).await {
            Ok(()) => PersistEvent::Saved { key },
            Err(e) => failed("save", e),
        },
        PersistRequest::Clear { key } => match store.clear(&key).await {
            Ok(()) => PersistEvent::Cleared { key },
            Err(e) => failed("clear", e),
        },
        PersistRequest::ClearAll => match store.clear_all().await {
            Ok(()) => PersistEvent::ClearedAll,
            Err(e) => failed("clear all", e),
        },
        PersistRequest::RecordCompletion(record) => match store.record_completion(&record).await {
            Ok(()) => PersistEvent::Recorded {
                key: record.session_key,
            },
            Err(e) => failed("record completion", e),
        },
    }
}

fn failed(action: &'static str, error: crate::store::StoreError) -> PersistEvent {
    PersistEvent::Failed {
        action,
        error: error.to_string(),
    }
}
