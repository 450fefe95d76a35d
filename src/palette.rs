//! Color palette and styling for CLI output.
//!
//! Every status marker and heading goes through these helpers so that
//! `--color never` yields plain text everywhere.

use owo_colors::{OwoColorize, Style};

/// Check mark for present items.
pub const OK_MARK: &str = "✓";
/// Cross for missing or failed items.
pub const FAIL_MARK: &str = "✗";

/// Style for present or successful items.
pub fn ok() -> Style {
    Style::new().green()
}

/// Style for missing or failed items.
pub fn fail() -> Style {
    Style::new().red()
}

/// Style for summary rules and headings.
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for URLs and clone commands.
pub fn link() -> Style {
    Style::new().cyan()
}

/// Style for description text - readable but subdued.
pub fn description() -> Style {
    Style::new().dimmed()
}

/// Style for warning text.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Apply a style when color is enabled.
fn styled(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format the check mark.
pub fn fmt_ok_mark(use_color: bool) -> String {
    styled(OK_MARK, ok(), use_color)
}

/// Format the cross mark.
pub fn fmt_fail_mark(use_color: bool) -> String {
    styled(FAIL_MARK, fail(), use_color)
}

/// Format a mark for a boolean presence.
pub fn fmt_mark(present: bool, use_color: bool) -> String {
    if present {
        fmt_ok_mark(use_color)
    } else {
        fmt_fail_mark(use_color)
    }
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    styled(text, heading(), use_color)
}

/// Format a URL or command with styling.
pub fn fmt_link(text: &str, use_color: bool) -> String {
    styled(text, link(), use_color)
}

/// Format description text with styling.
pub fn fmt_description(text: &str, use_color: bool) -> String {
    styled(text, description(), use_color)
}

/// Format warning text with styling.
pub fn fmt_warning(text: &str, use_color: bool) -> String {
    styled(text, warning(), use_color)
}

#[cfg(test)]
mod tests {
    use super::{fmt_heading, fmt_mark};

    #[test]
    fn plain_output_without_color() {
        assert_eq!(fmt_mark(true, false), "✓");
        assert_eq!(fmt_mark(false, false), "✗");
        assert_eq!(fmt_heading("Summary:", false), "Summary:");
    }

    #[test]
    fn colored_output_wraps_text() {
        let marked = fmt_mark(true, true);
        assert!(marked.contains('✓'));
        assert_ne!(marked, "✓");
    }
}
