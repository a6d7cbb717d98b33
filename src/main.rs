use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use greek_flashcards::config::{Config, StoreKind};
use greek_flashcards::decks::load_catalogue;
use greek_flashcards::logger;
use greek_flashcards::menu::{handle_menu_input, handle_reset_confirm, MenuAction, MenuState, HISTORY_LIMIT};
use greek_flashcards::persist_worker::{spawn_persist_worker, PersistEvent, PersistRequest};
use greek_flashcards::session::{handle_quiz_input, handle_summary_input, QuizSession};
use greek_flashcards::store::sqlite::default_db_path;
use greek_flashcards::store::{MemoryStore, RemoteStore, SnapshotStore, SqliteStore};
use greek_flashcards::ui::{draw_menu, draw_quit_confirmation, draw_quiz, draw_reset_confirmation, draw_summary};
use greek_flashcards::AppState;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(250);

fn open_store(kind: &StoreKind) -> Arc<dyn SnapshotStore> {
    let store: Result<Arc<dyn SnapshotStore>, _> = match kind {
        StoreKind::Sqlite { path } => {
            let path = path.clone().unwrap_or_else(default_db_path);
            SqliteStore::open(&path).map(|s| Arc::new(s) as Arc<dyn SnapshotStore>)
        }
        StoreKind::Remote { base_url, user_id } => {
            RemoteStore::new(base_url, user_id).map(|s| Arc::new(s) as Arc<dyn SnapshotStore>)
        }
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new()) as Arc<dyn SnapshotStore>),
    };

    store.unwrap_or_else(|e| {
        tracing::warn!("Could not open store ({}), progress will not survive a restart", e);
        Arc::new(MemoryStore::new())
    })
}

fn load_menu(rt: &tokio::runtime::Runtime, store: &dyn SnapshotStore, menu: &mut MenuState) {
    let mut saved = HashMap::new();
    for deck in &menu.decks {
        match rt.block_on(store.load(&deck.key)) {
            Ok(Some(snapshot)) => {
                saved.insert(deck.key.clone(), snapshot);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Could not load saved session for {}: {}", deck.key, e);
                menu.status = Some("Saved progress unavailable".to_string());
            }
        }
    }

    let history = rt
        .block_on(store.recent_completions(HISTORY_LIMIT))
        .unwrap_or_else(|e| {
            tracing::warn!("Could not load completion history: {}", e);
            Vec::new()
        });

    let completed = rt.block_on(store.completed_decks()).unwrap_or_else(|e| {
        tracing::warn!("Could not load completed decks: {}", e);
        HashSet::new()
    });

    menu.refresh(saved, history, completed);
}

fn drain_persist_events(
    events: &Receiver<PersistEvent>,
    mut session: Option<&mut QuizSession>,
    menu: &mut MenuState,
) {
    while let Ok(event) = events.try_recv() {
        if let PersistEvent::Failed { action, error } = &event {
            menu.status = Some(format!("Could not {}: {}", action, error));
        }
        if let Some(session) = session.as_deref_mut() {
            session.process_persist_event(event);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match Config::from_env() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    if let Err(e) = logger::init(&config.log_file) {
        eprintln!("Could not open log file {}: {}", config.log_file.display(), e);
    }
    if let Some(e) = config_error {
        tracing::warn!("Invalid configuration, using defaults: {}", e);
    }

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let store = open_store(&config.store);
    tracing::info!("Using {} store", store.name());

    let mut menu = MenuState::new(load_catalogue(&config.decks_dir), store.name());
    load_menu(&rt, store.as_ref(), &mut menu);

    let (request_tx, request_rx) = mpsc::channel::<PersistRequest>();
    let (event_tx, event_rx) = mpsc::channel::<PersistEvent>();
    let worker = spawn_persist_worker(store.clone(), event_tx, request_rx)
        .context("failed to spawn persistence worker")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut menu, config.engine, &request_tx, &event_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Let queued saves finish before exiting.
    drop(request_tx);
    if worker.join().is_err() {
        tracing::error!("Persistence worker panicked");
    }

    result.map_err(Into::into)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    menu: &mut MenuState,
    engine_config: greek_flashcards::EngineConfig,
    request_tx: &Sender<PersistRequest>,
    event_rx: &Receiver<PersistEvent>,
) -> io::Result<()> {
    let mut app_state = AppState::Menu;
    let mut quiz_session: Option<QuizSession> = None;

    loop {
        drain_persist_events(event_rx, quiz_session.as_mut(), menu);

        terminal.draw(|f| match app_state {
            AppState::Menu => draw_menu(f, menu),
            AppState::ResetConfirm => draw_reset_confirmation(f),
            AppState::Quiz => {
                if let Some(session) = &quiz_session {
                    draw_quiz(f, session);
                }
            }
            AppState::QuizQuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => {
                if let Some(session) = &quiz_session {
                    draw_summary(f, session);
                }
            }
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }

        match app_state {
            AppState::Menu => match handle_menu_input(menu, key, &mut app_state) {
                MenuAction::StartDeck(index) => {
                    if let Some(deck) = menu.decks.get(index).cloned() {
                        let saved = menu.take_saved(&deck.key);
                        quiz_session = Some(QuizSession::new(
                            deck,
                            engine_config,
                            saved,
                            Some(request_tx.clone()),
                        ));
                        app_state = AppState::Quiz;
                    }
                }
                MenuAction::Quit => break,
                MenuAction::ResetAll | MenuAction::None => {}
            },
            AppState::ResetConfirm => {
                if handle_reset_confirm(key, &mut app_state) == MenuAction::ResetAll {
                    tracing::info!("Resetting all progress");
                    if request_tx.send(PersistRequest::ClearAll).is_err() {
                        tracing::warn!("Persistence worker is gone, reset not stored");
                    }
                    menu.reset();
                }
            }
            AppState::Quiz => {
                if let Some(session) = &mut quiz_session {
                    handle_quiz_input(session, key, &mut app_state)?;
                    if app_state == AppState::Summary {
                        menu.absorb_session(session);
                    }
                }
            }
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    if let Some(session) = quiz_session.take() {
                        menu.absorb_session(&session);
                    }
                    app_state = AppState::Menu;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app_state = AppState::Quiz;
                }
                _ => {}
            },
            AppState::Summary => {
                if let Some(session) = &mut quiz_session {
                    handle_summary_input(session, key, &mut app_state)?;
                }
                if app_state == AppState::Menu
                    && let Some(session) = quiz_session.take()
                {
                    menu.absorb_session(&session);
                }
            }
        }
    }

    Ok(())
}
