pub mod config;
pub mod csv;
pub mod decks;
pub mod engine;
pub mod keyboard;
pub mod logger;
pub mod menu;
pub mod models;
pub mod normalize;
pub mod persist_worker;
pub mod progress;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod ui_tests;

// Re-exports for convenience
pub use config::{Config, ConfigError, StoreKind};
pub use decks::{builtin_decks, load_catalogue, Deck};
pub use engine::QuizEngine;
pub use models::{AppState, EngineConfig, EnginePhase, FeedbackEvent, QuizItem, RequeuePolicy};
pub use persist_worker::{spawn_persist_worker, PersistEvent, PersistRequest};
pub use session::{handle_quiz_input, handle_summary_input, QuizSession};
pub use snapshot::Snapshot;
pub use store::{SnapshotStore, StoreError};
pub use ui::{draw_menu, draw_quit_confirmation, draw_quiz, draw_reset_confirmation, draw_summary};
