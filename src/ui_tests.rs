#[cfg(test)]
mod ui_integration_tests {
    use crate::decks::{builtin_decks, Deck};
    use crate::engine::QuizEngine;
    use crate::menu::{handle_menu_input, MenuAction, MenuState};
    use crate::models::{AppState, EngineConfig, QuizItem};
    use crate::persist_worker::{spawn_persist_worker, PersistEvent, PersistRequest};
    use crate::session::{handle_quiz_input, handle_summary_input, QuizSession};
    use crate::store::{MemoryStore, SnapshotStore};
    use crate::ui::{draw_menu, draw_quiz, draw_summary};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_answer(session: &mut QuizSession, state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_quiz_input(session, key(KeyCode::Char(c)), state).unwrap();
        }
        handle_quiz_input(session, key(KeyCode::Enter), state).unwrap();
    }

    fn create_test_session() -> QuizSession {
        let deck = Deck::new(
            "numbersGame",
            "Numbers",
            "Type the Greek word for:",
            vec![
                QuizItem::new("ένα", "1"),
                QuizItem::new("δύο", "2"),
                QuizItem::new("τρία", "3"),
            ],
        );
        let engine = QuizEngine::in_order(deck.items.clone(), EngineConfig::default());
        QuizSession::from_engine(deck, engine, false, None)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                text.push_str(cell.symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_quiz_screen_shows_prompt_and_stats() {
        let session = create_test_session();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_quiz(f, &session)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Type the Greek word for:"));
        assert!(text.contains("Streak: 0 | Best: 0 | Progress: 0/3"));
        assert!(text.contains("Time elapsed: 0m 0"));
        assert!(text.contains("3 left"));
        assert!(text.contains("Keyboard: waiting for input"));
    }

    #[test]
    fn test_quiz_screen_after_answers() {
        let mut session = create_test_session();
        let mut state = AppState::Quiz;
        type_answer(&mut session, &mut state, "ένα");

        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| draw_quiz(f, &session)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Correct! Streak: 1"));
        assert!(text.contains("Progress: 1/3"));
        assert!(text.contains("History (1)"));
        assert!(text.contains("Keyboard: Greek"));
    }

    #[test]
    fn test_keyboard_warning_rendered() {
        let mut session = create_test_session();
        let mut state = AppState::Quiz;
        handle_quiz_input(&mut session, key(KeyCode::Char('e')), &mut state).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| draw_quiz(f, &session)).unwrap();
        assert!(screen_text(&terminal).contains("switch layout"));
    }

    #[test]
    fn test_peek_popup_lists_deck() {
        let mut session = create_test_session();
        let mut state = AppState::Quiz;
        handle_quiz_input(
            &mut session,
            KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL),
            &mut state,
        )
        .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_quiz(f, &session)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Numbers (3 items)"));
        assert!(text.contains("τρία"));
    }

    #[test]
    fn test_full_round_reaches_summary() {
        let mut session = create_test_session();
        let mut state = AppState::Quiz;

        // one miss, then answer whatever is asked
        type_answer(&mut session, &mut state, "λάθος");
        while let Some(answer) = session.engine.current_item().map(|i| i.answer.clone()) {
            type_answer(&mut session, &mut state, &answer);
        }
        assert_eq!(state, AppState::Summary);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw_summary(f, &session)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Session Summary - Numbers"));
        assert!(text.contains("Correct answers: 3/3"));
        assert!(text.contains("Best streak: 3"));
        assert!(text.contains("Attempts: 4 (75% first try)"));

        handle_summary_input(&mut session, key(KeyCode::Char('m')), &mut state).unwrap();
        assert_eq!(state, AppState::Menu);
    }

    #[test]
    fn test_menu_renders_decks_and_level() {
        let menu = MenuState::new(builtin_decks(), "memory");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_menu(f, &menu)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Greek Flashcards"));
        assert!(text.contains("Level 1"));
        assert!(text.contains("Alphabet"));
        assert!(text.contains("No completed sessions yet"));
        assert!(text.contains("Store: memory"));
    }

    #[test]
    fn test_menu_to_quiz_and_back_keeps_progress() {
        let mut menu = MenuState::new(builtin_decks(), "memory");
        let mut state = AppState::Menu;

        let MenuAction::StartDeck(index) = handle_menu_input(&mut menu, key(KeyCode::Enter), &mut state)
        else {
            panic!("expected a deck to start");
        };
        let deck = menu.decks[index].clone();
        let total = deck.len();
        let mut session = QuizSession::new(deck, EngineConfig::default(), None, None);
        state = AppState::Quiz;

        let answer = session.engine.current_item().unwrap().answer.clone();
        type_answer(&mut session, &mut state, &answer);
        menu.absorb_session(&session);

        let saved = menu.take_saved(&session.deck.key).unwrap();
        assert_eq!(saved.remaining_items.len(), total - 1);

        let resumed = QuizSession::new(session.deck.clone(), EngineConfig::default(), Some(saved), None);
        assert!(resumed.resumed);
        assert_eq!(resumed.engine.correct_count(), 1);
        assert_eq!(resumed.engine.remaining(), total - 1);
    }

    #[test]
    fn test_session_persists_through_worker() {
        let store = Arc::new(MemoryStore::new());
        let (req_tx, req_rx) = mpsc::channel::<PersistRequest>();
        let (event_tx, event_rx) = mpsc::channel::<PersistEvent>();
        let worker = spawn_persist_worker(store.clone(), event_tx, req_rx).unwrap();

        let deck = Deck::new("namesGame", "Greek Names", "Type the name for:", vec![
            QuizItem::new("Ζωή", "Zoi"),
            QuizItem::new("Zoi", "Ζωή"),
        ]);
        let engine = QuizEngine::in_order(deck.items.clone(), EngineConfig::default());
        let mut session = QuizSession::from_engine(deck, engine, false, Some(req_tx));
        let mut state = AppState::Quiz;

        type_answer(&mut session, &mut state, "Ζωή");
        let event = event_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(event, PersistEvent::Saved { key: "namesGame".to_string() });
        session.process_persist_event(event);

        let rt = tokio::runtime::Runtime::new().unwrap();
        let saved = rt.block_on(store.load("namesGame")).unwrap().unwrap();
        assert_eq!(saved.remaining_items, vec![QuizItem::new("Zoi", "Ζωή")]);
        assert_eq!(saved.streak, 1);

        type_answer(&mut session, &mut state, "Zoi");
        assert_eq!(state, AppState::Summary);
        assert_eq!(
            event_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            PersistEvent::Cleared { key: "namesGame".to_string() }
        );
        assert_eq!(
            event_rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            PersistEvent::Recorded { key: "namesGame".to_string() }
        );
        assert!(rt.block_on(store.load("namesGame")).unwrap().is_none());
        assert_eq!(rt.block_on(store.recent_completions(5)).unwrap().len(), 1);

        drop(session);
        worker.join().unwrap();
    }
}
