pub mod layout;
mod menu;
mod quiz;
mod sessions;
mod summary;

use ratatui::style::{Color, Modifier, Style};

pub use layout::{calculate_quiz_chunks, calculate_summary_chunks, centered_rect};
pub use menu::{deck_line, draw_menu, draw_reset_confirmation};
pub use quiz::{draw_confirmation, draw_quit_confirmation, draw_quiz, feedback_color, stats_line};
pub use sessions::format_session_date;
pub use summary::{accuracy, draw_summary};

/// Style for key names in help bars.
pub(crate) fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
