use std::collections::{HashMap, HashSet};

use crossterm::event::{KeyCode, KeyEvent};

use crate::decks::Deck;
use crate::models::AppState;
use crate::progress::ProgressSummary;
use crate::session::QuizSession;
use crate::snapshot::Snapshot;
use crate::store::CompletionRecord;

pub const DECKS_PANEL: usize = 0;
pub const HISTORY_PANEL: usize = 1;
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    None,
    StartDeck(usize),
    ResetAll,
    Quit,
}

/// Everything the deck menu shows.
#[derive(Debug, Default)]
pub struct MenuState {
    pub decks: Vec<Deck>,
    pub selected_deck: usize,
    pub history: Vec<CompletionRecord>,
    pub selected_history: usize,
    pub focused_panel: usize,
    pub saved: HashMap<String, Snapshot>,
    /// Every deck ever completed, not just those in `history`.
    pub completed: HashSet<String>,
    pub progress: ProgressSummary,
    pub store_name: String,
    pub status: Option<String>,
}

impl MenuState {
    pub fn new(decks: Vec<Deck>, store_name: &str) -> Self {
        let mut menu = Self {
            decks,
            store_name: store_name.to_string(),
            ..Self::default()
        };
        menu.recompute();
        menu
    }

    pub fn refresh(
        &mut self,
        saved: HashMap<String, Snapshot>,
        history: Vec<CompletionRecord>,
        completed: HashSet<String>,
    ) {
        self.saved = saved;
        self.history = history;
        self.completed = completed;
        self.selected_history = self.selected_history.min(self.history.len().saturating_sub(1));
        self.recompute();
    }

    fn recompute(&mut self) {
        self.progress =
            ProgressSummary::compute(&self.decks, &self.saved, &self.history, &self.completed);
    }

    pub fn selected(&self) -> Option<&Deck> {
        self.decks.get(self.selected_deck)
    }

    pub fn take_saved(&mut self, key: &str) -> Option<Snapshot> {
        self.saved.remove(key)
    }

    /// Folds a session's in-memory state into the view, so the menu does not
    /// wait on the persistence worker to catch up. A fresh session left
    /// before any answer saved nothing and is ignored.
    pub fn absorb_session(&mut self, session: &QuizSession) {
        let untouched = !session.resumed
            && session.engine.correct_count() == 0
            && session.engine.log_len() == 0;
        if untouched && !session.is_finished() {
            return;
        }
        let key = session.deck.key.clone();
        if session.is_finished() {
            self.saved.remove(&key);
            self.completed.insert(key.clone());
            if let Some(record) = session.completion_record()
                && !self.history.contains(&record)
            {
                self.history.insert(0, record);
                self.history.truncate(HISTORY_LIMIT);
            }
        } else {
            self.saved.insert(key, session.engine.snapshot());
        }
        self.recompute();
    }

    /// Drops every saved session and the history from the view.
    pub fn reset(&mut self) {
        self.refresh(HashMap::new(), Vec::new(), HashSet::new());
        self.status = Some("All progress reset".to_string());
    }
}

pub fn handle_menu_input(menu: &mut MenuState, key: KeyEvent, app_state: &mut AppState) -> MenuAction {
    match key.code {
        KeyCode::Char('1') => menu.focused_panel = DECKS_PANEL,
        KeyCode::Char('2') => menu.focused_panel = HISTORY_PANEL,
        KeyCode::Tab => menu.focused_panel = 1 - menu.focused_panel.min(1),
        KeyCode::Up => {
            if menu.focused_panel == DECKS_PANEL {
                menu.selected_deck = menu.selected_deck.saturating_sub(1);
            } else {
                menu.selected_history = menu.selected_history.saturating_sub(1);
            }
        }
        KeyCode::Down => {
            if menu.focused_panel == DECKS_PANEL {
                if menu.selected_deck < menu.decks.len().saturating_sub(1) {
                    menu.selected_deck += 1;
                }
            } else if menu.selected_history < menu.history.len().saturating_sub(1) {
                menu.selected_history += 1;
            }
        }
        KeyCode::Enter => {
            if menu.focused_panel == HISTORY_PANEL {
                // Replay the deck of the highlighted history entry.
                if let Some(record) = menu.history.get(menu.selected_history)
                    && let Some(index) = menu.decks.iter().position(|d| d.key == record.session_key)
                {
                    menu.selected_deck = index;
                    menu.focused_panel = DECKS_PANEL;
                }
            }
            if menu.selected().is_some_and(|deck| !deck.is_empty()) {
                menu.status = None;
                return MenuAction::StartDeck(menu.selected_deck);
            }
            menu.status = Some("This deck has no items".to_string());
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            *app_state = AppState::ResetConfirm;
        }
        KeyCode::Char('q') | KeyCode::Esc => return MenuAction::Quit,
        _ => {}
    }
    MenuAction::None
}

pub fn handle_reset_confirm(key: KeyEvent, app_state: &mut AppState) -> MenuAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            *app_state = AppState::Menu;
            MenuAction::ResetAll
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            *app_state = AppState::Menu;
            MenuAction::None
        }
        _ => MenuAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decks::builtin_decks;
    use crate::models::QuizItem;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn record(key: &str) -> CompletionRecord {
        CompletionRecord {
            session_key: key.to_string(),
            deck_title: key.to_string(),
            started_at: 0,
            finished_at: 30,
            correct_count: 14,
            best_streak: 14,
            total_items: 14,
        }
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        let mut state = AppState::Menu;
        handle_menu_input(&mut menu, key(KeyCode::Up), &mut state);
        assert_eq!(menu.selected_deck, 0);
        for _ in 0..20 {
            handle_menu_input(&mut menu, key(KeyCode::Down), &mut state);
        }
        assert_eq!(menu.selected_deck, menu.decks.len() - 1);
    }

    #[test]
    fn test_enter_starts_selected_deck() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        let mut state = AppState::Menu;
        handle_menu_input(&mut menu, key(KeyCode::Down), &mut state);
        let action = handle_menu_input(&mut menu, key(KeyCode::Enter), &mut state);
        assert_eq!(action, MenuAction::StartDeck(1));
    }

    #[test]
    fn test_history_enter_jumps_to_deck() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        menu.refresh(HashMap::new(), vec![record("weekdaysGame")], HashSet::new());
        let mut state = AppState::Menu;

        handle_menu_input(&mut menu, key(KeyCode::Char('2')), &mut state);
        let action = handle_menu_input(&mut menu, key(KeyCode::Enter), &mut state);
        let index = menu.decks.iter().position(|d| d.key == "weekdaysGame").unwrap();
        assert_eq!(action, MenuAction::StartDeck(index));
        assert_eq!(menu.focused_panel, DECKS_PANEL);
    }

    #[test]
    fn test_refresh_updates_progress() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        assert_eq!(menu.progress.overall, 0);

        let mut saved = HashMap::new();
        saved.insert(
            "numbersGame".to_string(),
            Snapshot {
                remaining_items: vec![QuizItem::new("ένα", "1"); 20],
                ..Snapshot::default()
            },
        );
        menu.refresh(saved, vec![record("alphabetGame")], HashSet::new());

        let numbers = menu.decks.iter().position(|d| d.key == "numbersGame").unwrap();
        let alphabet = menu.decks.iter().position(|d| d.key == "alphabetGame").unwrap();
        assert_eq!(menu.progress.percentages[numbers], 50);
        assert_eq!(menu.progress.percentages[alphabet], 100);
        assert!(menu.progress.resumable[numbers]);
        assert_eq!(menu.progress.completed, 1);
    }

    #[test]
    fn test_reset_flow() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        menu.refresh(HashMap::new(), vec![record("alphabetGame")], HashSet::new());
        let mut state = AppState::Menu;

        handle_menu_input(&mut menu, key(KeyCode::Char('r')), &mut state);
        assert_eq!(state, AppState::ResetConfirm);

        assert_eq!(handle_reset_confirm(key(KeyCode::Char('n')), &mut state), MenuAction::None);
        assert_eq!(state, AppState::Menu);

        state = AppState::ResetConfirm;
        assert_eq!(handle_reset_confirm(key(KeyCode::Char('y')), &mut state), MenuAction::ResetAll);
        menu.reset();
        assert_eq!(menu.progress.completed, 0);
        assert!(menu.history.is_empty());
        assert_eq!(menu.status.as_deref(), Some("All progress reset"));
    }

    #[test]
    fn test_absorb_session() {
        use crate::engine::QuizEngine;
        use crate::models::EngineConfig;

        let mut menu = MenuState::new(builtin_decks(), "memory");
        let deck = Deck::new(
            "weekdaysGame",
            "Weekdays",
            "",
            vec![QuizItem::new("Δευτέρα", "Monday"), QuizItem::new("Τρίτη", "Tuesday")],
        );
        let engine = QuizEngine::in_order(deck.items.clone(), EngineConfig::default());
        let mut session = QuizSession::from_engine(deck, engine, false, None);

        session.insert_char('x');
        session.submit();
        menu.absorb_session(&session);
        assert!(menu.saved.contains_key("weekdaysGame"));
        assert!(menu.history.is_empty());

        while let Some(answer) = session.engine.current_item().map(|i| i.answer.clone()) {
            for c in answer.chars() {
                session.insert_char(c);
            }
            session.submit();
        }
        menu.absorb_session(&session);
        menu.absorb_session(&session);
        assert!(!menu.saved.contains_key("weekdaysGame"));
        assert_eq!(menu.history.len(), 1);
        assert_eq!(menu.history[0].session_key, "weekdaysGame");
        assert!(menu.completed.contains("weekdaysGame"));
    }

    #[test]
    fn test_absorb_ignores_unanswered_session() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        let deck = menu.decks[0].clone();
        let session = QuizSession::new(deck, crate::models::EngineConfig::default(), None, None);

        menu.absorb_session(&session);
        assert!(menu.saved.is_empty());
        assert!(!menu.progress.resumable[0]);
    }

    #[test]
    fn test_quit() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        let mut state = AppState::Menu;
        assert_eq!(handle_menu_input(&mut menu, key(KeyCode::Char('q')), &mut state), MenuAction::Quit);
    }
}
