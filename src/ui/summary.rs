use crate::session::QuizSession;
use crate::ui::key_style;
use crate::ui::layout::calculate_summary_chunks;
use crate::ui::quiz::feedback_color;
use crate::utils::{format_elapsed, truncate_string};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Share of first-try answers, 0-100. Every miss adds one extra attempt.
pub fn accuracy(correct: u32, attempts: usize) -> u32 {
    if attempts == 0 {
        return 0;
    }
    ((correct as f64 / attempts as f64) * 100.0).round() as u32
}

pub fn draw_summary(f: &mut Frame, session: &QuizSession) {
    let layout = calculate_summary_chunks(f.area());

    let title = Paragraph::new(format!("Session Summary - {}", session.deck.title))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let engine = &session.engine;
    let elapsed = session
        .elapsed()
        .map(format_elapsed)
        .unwrap_or_else(|| "0m 00s".to_string());
    let attempts = engine.log_len();
    let label = Style::default().add_modifier(Modifier::BOLD);

    let stats = vec![
        Line::from(vec![
            Span::styled("Correct answers: ", label),
            Span::from(format!("{}/{}", engine.correct_count(), session.deck.len())),
        ]),
        Line::from(vec![
            Span::styled("Best streak: ", label),
            Span::from(engine.best_streak().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Attempts: ", label),
            Span::from(format!(
                "{} ({}% first try)",
                attempts,
                accuracy(engine.correct_count(), attempts)
            )),
        ]),
        Line::from(vec![
            Span::styled("Time: ", label),
            Span::from(elapsed),
        ]),
    ];
    let stats = Paragraph::new(stats).block(Block::default().borders(Borders::ALL).title("Results"));
    f.render_widget(stats, layout.stats_area);

    let items: Vec<ListItem> = engine
        .log()
        .map(|message| {
            ListItem::new(truncate_string(message, 120))
                .style(Style::default().fg(feedback_color(message)))
        })
        .collect();
    let log = List::new(items).block(Block::default().borders(Borders::ALL).title("History"));
    f.render_widget(log, layout.log_area);

    let mut help_spans = vec![
        Span::styled("r", key_style()),
        Span::from(" Restart  "),
        Span::styled("m/Enter", key_style()),
        Span::from(" Main Menu  "),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ];
    if let Some(error) = &session.last_store_error {
        help_spans.push(Span::styled(format!("  {}", error), Style::default().fg(Color::Red)));
    }
    let help = Paragraph::new(Line::from(help_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
