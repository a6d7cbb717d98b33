use crate::session::QuizSession;
use crate::ui::key_style;
use crate::ui::layout::{calculate_quiz_chunks, centered_rect};
use crate::utils::{display_width, format_elapsed};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Colour for a feedback line, keyed off its leading marker.
pub fn feedback_color(message: &str) -> Color {
    if message.starts_with('✅') {
        Color::Green
    } else if message.starts_with('❌') {
        Color::Red
    } else {
        Color::White
    }
}

pub fn stats_line(session: &QuizSession) -> String {
    let elapsed = session
        .elapsed()
        .map(format_elapsed)
        .unwrap_or_else(|| "0m 00s".to_string());
    format!(
        "Streak: {} | Best: {} | Progress: {}/{} | Time elapsed: {}",
        session.engine.streak(),
        session.engine.best_streak(),
        session.engine.correct_count(),
        session.deck.len(),
        elapsed
    )
}

pub fn draw_quiz(f: &mut Frame, session: &QuizSession) {
    let layout = calculate_quiz_chunks(f.area());

    let title = if session.resumed {
        format!("{} (resumed)", session.deck.title)
    } else {
        session.deck.title.clone()
    };
    let header = Paragraph::new(stats_line(session))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(header, layout.header_area);

    let prompt_text = match session.engine.current_item() {
        Some(item) => vec![
            Line::from(session.deck.prompt_label.as_str()),
            Line::from(Span::styled(
                item.prompt.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
        ],
        None => vec![Line::from("All items answered!")],
    };
    let prompt = Paragraph::new(prompt_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} left", session.engine.remaining())),
        );
    f.render_widget(prompt, layout.prompt_area);

    let input = Paragraph::new(if session.input_buffer.is_empty() {
        Span::styled(
            "[Type your answer here...]",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::from(session.input_buffer.as_str())
    })
    .block(Block::default().borders(Borders::ALL).title("Your Answer"));
    f.render_widget(input, layout.input_area);

    if !session.show_peek {
        let before_cursor: String = session
            .input_buffer
            .chars()
            .take(session.cursor_position)
            .collect();
        let max_x = layout.input_area.width.saturating_sub(2);
        let cursor_x = layout.input_area.x + 1 + display_width(&before_cursor).min(max_x);
        f.set_cursor_position((cursor_x, layout.input_area.y + 1));
    }

    let feedback = match &session.last_feedback {
        Some(event) => Paragraph::new(event.message.as_str())
            .style(Style::default().fg(feedback_color(&event.message))),
        None => Paragraph::new("Press Enter to check your answer")
            .style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(
        feedback
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Feedback")),
        layout.feedback_area,
    );

    draw_log(f, session, layout.log_area);
    draw_help(f, session, layout.help_area);

    if session.show_peek {
        draw_peek_popup(f, session);
    }
}

fn draw_log(f: &mut Frame, session: &QuizSession, area: Rect) {
    let items: Vec<ListItem> = session
        .engine
        .log()
        .map(|message| ListItem::new(message).style(Style::default().fg(feedback_color(message))))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({})", session.engine.log_len())),
    );
    f.render_widget(list, area);
}

fn draw_help(f: &mut Frame, session: &QuizSession, area: Rect) {
    let keys = Line::from(vec![
        Span::styled("Enter", key_style()),
        Span::from(" Submit  "),
        Span::styled("Ctrl+P", key_style()),
        Span::from(" Peek Deck  "),
        Span::styled("Esc", key_style()),
        Span::from(" Quit to Menu  "),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ]);

    let keyboard = match session.keyboard.language() {
        None => Line::from(Span::styled(
            "Keyboard: waiting for input",
            Style::default().fg(Color::DarkGray),
        )),
        Some(language) if session.keyboard_mismatch() => Line::from(Span::styled(
            format!("Keyboard: {} - switch layout for this answer!", language.name()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Some(language) => Line::from(Span::styled(
            format!("Keyboard: {}", language.name()),
            Style::default().fg(Color::Green),
        )),
    };

    let mut lines = vec![keys, keyboard];
    if let Some(error) = &session.last_store_error {
        lines[1].spans.push(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        ));
    }

    let help = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn draw_peek_popup(f: &mut Frame, session: &QuizSession) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);

    let rows: Vec<Row> = session
        .deck
        .items
        .iter()
        .skip(session.peek_scroll as usize)
        .map(|item| Row::new(vec![item.prompt.clone(), item.answer.clone()]))
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Percentage(50), Constraint::Percentage(50)],
    )
    .header(
        Row::new(vec!["Prompt", "Answer"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({} items)", session.deck.title, session.deck.len()))
            .title_bottom(Line::from(" ↑/↓ Scroll  Esc Close ").alignment(Alignment::Center)),
    );
    f.render_widget(table, area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    draw_confirmation(
        f,
        "Quit to Menu",
        "Return to main menu? Your progress is saved.",
        "Yes (Return to Menu)",
        "No (Continue Quiz)",
    );
}

pub fn draw_confirmation(f: &mut Frame, title: &str, message: &str, yes: &str, no: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(format!(" {}  ", yes)),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(format!(" {}  ", no)),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
