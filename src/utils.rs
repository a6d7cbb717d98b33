use chrono::Duration;
use unicode_width::UnicodeWidthStr;

/// Shortens `s` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// `"{m}m {ss}s"`, minutes unbounded, seconds zero-padded.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}m {:02}s", secs / 60, secs % 60)
}

/// Terminal columns taken by `s`, used to place the cursor after typed text.
pub fn display_width(s: &str) -> u16 {
    s.width().min(u16::MAX as usize) as u16
}
