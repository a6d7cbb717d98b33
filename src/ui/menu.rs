use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
    Frame,
};

use crate::menu::{MenuState, DECKS_PANEL, HISTORY_PANEL};
use crate::store::CompletionRecord;
use crate::ui::key_style;
use crate::ui::quiz::draw_confirmation;
use crate::ui::sessions::format_session_date;
use crate::utils::truncate_string;

fn format_history_item(record: &CompletionRecord) -> String {
    format!(
        "{} - {} ({}/{}, best streak {})",
        format_session_date(record.finished_at),
        truncate_string(&record.deck_title, 24),
        record.correct_count,
        record.total_items,
        record.best_streak
    )
}

fn draw_panel_header(area: ratatui::layout::Rect, title: &str, focused: bool, f: &mut Frame) {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let header = Paragraph::new(title)
        .style(style)
        .alignment(Alignment::Left)
        .block(Block::default());

    f.render_widget(header, area);
}

fn panel_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn selected_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

pub fn deck_line(title: &str, items: usize, percent: u8, resumable: bool) -> String {
    let resume = if resumable { "  ▶ resume" } else { "" };
    format!("{:<16} {:>3} items  {:>3}%{}", truncate_string(title, 16), items, percent, resume)
}

pub fn draw_menu(f: &mut Frame, menu: &MenuState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    let title = Paragraph::new("Greek Flashcards v0.1.0")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Level {}  ({} of {} decks completed)",
            menu.progress.level,
            menu.progress.completed,
            menu.decks.len()
        )))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(menu.progress.overall.min(100) as u16)
        .label(format!("Overall {}%", menu.progress.overall));
    f.render_widget(gauge, chunks[1]);

    let deck_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[2]);

    let history_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(chunks[3]);

    let decks_focused = menu.focused_panel == DECKS_PANEL;
    draw_panel_header(deck_chunks[0], "[1] Decks", decks_focused, f);

    let deck_items: Vec<ListItem> = menu
        .decks
        .iter()
        .enumerate()
        .map(|(i, deck)| {
            let percent = menu.progress.percentages.get(i).copied().unwrap_or(0);
            let resumable = menu.progress.resumable.get(i).copied().unwrap_or(false);
            let style = if percent == 100 && i != menu.selected_deck {
                Style::default().fg(Color::Green)
            } else {
                selected_style(i == menu.selected_deck && decks_focused)
            };
            ListItem::new(deck_line(&deck.title, deck.len(), percent, resumable)).style(style)
        })
        .collect();

    let deck_list = List::new(deck_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(panel_border(decks_focused)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(deck_list, deck_chunks[1]);

    let history_focused = menu.focused_panel == HISTORY_PANEL;
    draw_panel_header(history_chunks[0], "[2] Completed Sessions", history_focused, f);

    let history_items: Vec<ListItem> = if menu.history.is_empty() {
        vec![ListItem::new("No completed sessions yet").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        menu.history
            .iter()
            .enumerate()
            .map(|(i, record)| {
                ListItem::new(format_history_item(record))
                    .style(selected_style(i == menu.selected_history && history_focused))
            })
            .collect()
    };

    let history_list = List::new(history_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(panel_border(history_focused)),
    );
    f.render_widget(history_list, history_chunks[1]);

    let help_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[4]);

    let (status_text, status_color) = match &menu.status {
        Some(status) => (status.clone(), Color::Yellow),
        None => (format!("Store: {}", menu.store_name), Color::Green),
    };
    let status = Paragraph::new(Line::from(status_text))
        .style(
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, help_chunks[0]);

    let help_text = vec![Line::from(vec![
        Span::styled("1/2", key_style()),
        Span::from(" Focus Panel  "),
        Span::styled("↑/↓", key_style()),
        Span::from(" Navigate  "),
        Span::styled("Enter", key_style()),
        Span::from(" Play  "),
        Span::styled("r", key_style()),
        Span::from(" Reset Progress  "),
        Span::styled("q/Ctrl+C", key_style()),
        Span::from(" Quit"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, help_chunks[1]);
}

pub fn draw_reset_confirmation(f: &mut Frame) {
    draw_confirmation(
        f,
        "Reset Progress",
        "Delete every saved session and the completion history?",
        "Yes (Reset)",
        "No (Keep Progress)",
    );
}
