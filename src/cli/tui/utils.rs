//! Shared utilities for TUI views

use ratatui::style::{Color, Style};

use crate::domain::ShiftStatus;

/// Truncate a string to max_len characters, adding "…" if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Cell colour for a status
pub fn status_style(status: ShiftStatus) -> Style {
    match status {
        ShiftStatus::Work => Style::default().fg(Color::Green),
        ShiftStatus::Off => Style::default().fg(Color::DarkGray),
        ShiftStatus::Request => Style::default().fg(Color::Yellow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string() {
        assert_eq!(truncate_str("田中", 4), "田中");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_str("新規スタッフ", 4), "新規ス…");
        assert_eq!(truncate_str("", 3), "");
    }
}
