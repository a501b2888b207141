//! Color helpers for CLI output.
//!
//! `console` disables styling automatically when stdout is not a terminal or
//! `NO_COLOR` is set.

use comfy_table::Color;
use console::{style, StyledObject};

/// Relevance percentage colored by strength.
///
/// Green at 75% and above, yellow from 40%, dim below that.
pub fn colorize_relevance(relevance: f32, text: String) -> StyledObject<String> {
    if relevance >= 0.75 {
        style(text).green().bold()
    } else if relevance >= 0.40 {
        style(text).yellow()
    } else {
        style(text).dim()
    }
}

/// Table cell color for a relevance score, same thresholds as
/// [`colorize_relevance`].
pub fn relevance_color(relevance: f32) -> Color {
    if relevance >= 0.75 {
        Color::Green
    } else if relevance >= 0.40 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}

/// Source file names are cyan everywhere they appear.
pub fn source_name(name: &str) -> StyledObject<&str> {
    style(name).cyan()
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", style(name).bold(), style(":").dim())
}

/// Section header with underline.
pub fn section_header(title: &str) -> String {
    format!("\n{}", style(title).bold().underlined())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_color_thresholds() {
        assert_eq!(relevance_color(0.9), Color::Green);
        assert_eq!(relevance_color(0.5), Color::Yellow);
        assert_eq!(relevance_color(0.1), Color::DarkGrey);
    }
}
