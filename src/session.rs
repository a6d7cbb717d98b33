use crate::decks::Deck;
use crate::engine::QuizEngine;
use crate::keyboard::KeyboardDetector;
use crate::models::{AppState, EngineConfig, FeedbackEvent};
use crate::persist_worker::{PersistEvent, PersistRequest};
use crate::snapshot::Snapshot;
use crate::store::CompletionRecord;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::sync::mpsc::Sender;

/// One deck being drilled in the terminal.
///
/// `input_buffer` mirrors the engine's current input so the cursor can move
/// inside it; every edit is pushed back through `QuizEngine::set_input`.
pub struct QuizSession {
    pub deck: Deck,
    pub engine: QuizEngine,
    pub input_buffer: String,
    /// Character index into `input_buffer`.
    pub cursor_position: usize,
    pub last_feedback: Option<FeedbackEvent>,
    pub keyboard: KeyboardDetector,
    pub show_peek: bool,
    pub peek_scroll: u16,
    pub resumed: bool,
    pub last_store_error: Option<String>,
    pub persist_tx: Option<Sender<PersistRequest>>,
    completion_sent: bool,
}

impl QuizSession {
    /// Resumes from `saved` when it still has items, otherwise starts a
    /// fresh shuffle of the deck.
    pub fn new(
        deck: Deck,
        config: EngineConfig,
        saved: Option<Snapshot>,
        persist_tx: Option<Sender<PersistRequest>>,
    ) -> Self {
        let (engine, resumed) = match saved.filter(Snapshot::is_resumable) {
            Some(snapshot) => {
                tracing::info!(
                    "Resuming {} with {} items left",
                    deck.key,
                    snapshot.remaining_items.len()
                );
                (QuizEngine::restore(snapshot, config), true)
            }
            None => {
                tracing::info!("Starting {} with {} items", deck.key, deck.len());
                (QuizEngine::new(deck.items.clone(), config), false)
            }
        };
        Self::from_engine(deck, engine, resumed, persist_tx)
    }

    pub fn from_engine(
        deck: Deck,
        engine: QuizEngine,
        resumed: bool,
        persist_tx: Option<Sender<PersistRequest>>,
    ) -> Self {
        Self {
            deck,
            engine,
            input_buffer: String::new(),
            cursor_position: 0,
            last_feedback: None,
            keyboard: KeyboardDetector::new(),
            show_peek: false,
            peek_scroll: 0,
            resumed,
            last_store_error: None,
            persist_tx,
            completion_sent: false,
        }
    }

    /// Fresh shuffle of the same deck; any saved progress is dropped.
    pub fn restart(&mut self) {
        let config = self.engine.config();
        self.engine = QuizEngine::new(self.deck.items.clone(), config);
        self.input_buffer.clear();
        self.cursor_position = 0;
        self.last_feedback = None;
        self.show_peek = false;
        self.peek_scroll = 0;
        self.resumed = false;
        self.completion_sent = false;
        self.send(PersistRequest::Clear {
            key: self.deck.key.clone(),
        });
    }

    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Whether the detected keyboard differs from the script of the answer.
    pub fn keyboard_mismatch(&self) -> bool {
        self.engine
            .current_item()
            .is_some_and(|item| self.keyboard.mismatches(&item.answer))
    }

    fn sync_input(&mut self) {
        self.engine.set_input(&self.input_buffer);
        self.input_buffer = self.engine.current_input().to_string();
        self.cursor_position = self.cursor_position.min(self.input_buffer.chars().count());
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    pub fn insert_char(&mut self, c: char) {
        self.keyboard.observe(c);
        let at = self.byte_index(self.cursor_position);
        self.input_buffer.insert(at, c);
        self.cursor_position += 1;
        self.sync_input();
    }

    pub fn backspace(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let at = self.byte_index(self.cursor_position - 1);
        self.input_buffer.remove(at);
        self.cursor_position -= 1;
        self.sync_input();
    }

    /// Evaluates the current input and persists the new state.
    pub fn submit(&mut self) -> Option<&FeedbackEvent> {
        let event = self.engine.submit()?;
        self.input_buffer.clear();
        self.cursor_position = 0;
        tracing::debug!(
            "{}: correct={} perfect={} remaining={}",
            self.deck.key,
            event.is_correct,
            event.is_perfect_match,
            self.engine.remaining()
        );
        self.last_feedback = Some(event);
        self.persist();
        self.last_feedback.as_ref()
    }

    /// Saves while in progress; once finished, clears the snapshot and
    /// records the completion a single time.
    fn persist(&mut self) {
        let key = self.deck.key.clone();
        if !self.engine.is_finished() {
            self.send(PersistRequest::Save {
                key,
                snapshot: self.engine.snapshot(),
            });
            return;
        }
        if self.completion_sent {
            return;
        }
        self.completion_sent = true;
        self.send(PersistRequest::Clear { key });
        if let Some(record) = self.completion_record() {
            self.send(PersistRequest::RecordCompletion(record));
        }
    }

    pub fn completion_record(&self) -> Option<CompletionRecord> {
        let finished_at = self.engine.finished_at()?;
        let started_at = self.engine.started_at().unwrap_or(finished_at);
        Some(CompletionRecord {
            session_key: self.deck.key.clone(),
            deck_title: self.deck.title.clone(),
            started_at: started_at.timestamp().max(0) as u64,
            finished_at: finished_at.timestamp().max(0) as u64,
            correct_count: self.engine.correct_count(),
            best_streak: self.engine.best_streak(),
            total_items: self.deck.len(),
        })
    }

    fn send(&mut self, request: PersistRequest) {
        let Some(tx) = &self.persist_tx else {
            return;
        };
        if tx.send(request).is_ok() {
            return;
        }
        tracing::warn!("Persist worker is gone, progress for {} is not saved", self.deck.key);
        self.last_store_error = Some("Progress is not being saved".to_string());
        self.persist_tx = None;
    }

    pub fn process_persist_event(&mut self, event: PersistEvent) {
        match event {
            PersistEvent::Failed { action, error } => {
                self.last_store_error = Some(format!("Could not {} progress: {}", action, error));
            }
            PersistEvent::Saved { .. } | PersistEvent::Cleared { .. } => {
                self.last_store_error = None;
            }
            PersistEvent::ClearedAll | PersistEvent::Recorded { .. } => {}
        }
    }

    /// Time since the session started, frozen once it finished.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.engine.elapsed(Utc::now())
    }
}

pub fn handle_quiz_input(
    session: &mut QuizSession,
    key: KeyEvent,
    app_state: &mut AppState,
) -> io::Result<()> {
    if session.show_peek {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                session.show_peek = false;
                session.peek_scroll = 0;
            }
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                session.show_peek = false;
                session.peek_scroll = 0;
            }
            KeyCode::Down => {
                let max = u16::try_from(session.deck.len().saturating_sub(1)).unwrap_or(u16::MAX);
                session.peek_scroll = session.peek_scroll.saturating_add(1).min(max);
            }
            KeyCode::Up => {
                session.peek_scroll = session.peek_scroll.saturating_sub(1);
            }
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => {
            *app_state = AppState::QuizQuitConfirm;
        }
        KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            session.show_peek = true;
            session.peek_scroll = 0;
        }
        KeyCode::Enter => {
            session.submit();
            if session.is_finished() {
                *app_state = AppState::Summary;
            }
        }
        KeyCode::Left => {
            session.cursor_position = session.cursor_position.saturating_sub(1);
        }
        KeyCode::Right => {
            if session.cursor_position < session.input_buffer.chars().count() {
                session.cursor_position += 1;
            }
        }
        KeyCode::Home => session.cursor_position = 0,
        KeyCode::End => session.cursor_position = session.input_buffer.chars().count(),
        KeyCode::Backspace => session.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            session.insert_char(c);
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_summary_input(
    session: &mut QuizSession,
    key: KeyEvent,
    app_state: &mut AppState,
) -> io::Result<()> {
    match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => {
            session.restart();
            *app_state = AppState::Quiz;
        }
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('m') | KeyCode::Char('q') => {
            *app_state = AppState::Menu;
        }
        _ => {}
    }
    Ok(())
}
