//! Theme and styling for the mocktty TUI.
//!
//! A fixed dark palette with a single accent color; styling beyond these
//! roles is out of scope for the console.

use ratatui::style::{Color, Modifier, Style};

/// Accent color for highlights and focus indicators.
pub const ACCENT: Color = Color::Rgb(237, 171, 8);

/// Primary foreground color for normal text.
pub const FG: Color = Color::Rgb(224, 224, 230);

/// Muted foreground color for hints, labels, and secondary information.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);

/// Default border color for unfocused UI elements.
pub const BORDER: Color = Color::Rgb(72, 72, 80);

/// Focused border color.
pub const BORDER_FOCUS: Color = ACCENT;

/// Background color for selected list items.
pub const BG_SELECT: Color = Color::Rgb(38, 32, 18);

/// Color for success markers and copy acknowledgments.
pub const OK: Color = Color::Rgb(110, 220, 126);

/// Warning color for error states.
pub const WARN: Color = Color::Rgb(220, 96, 110);

/// Border style based on focus state.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUS)
    } else {
        Style::default().fg(BORDER)
    }
}

/// Style for block and column titles.
pub fn title_style() -> Style {
    Style::default().fg(FG).add_modifier(Modifier::BOLD)
}

/// Style for normal text content.
pub fn text_style() -> Style {
    Style::default().fg(FG)
}

/// Style for secondary text.
pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

/// Style for selected list items.
pub fn list_highlight_style() -> Style {
    Style::default().bg(BG_SELECT).fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Style for the table cell under the cursor.
pub fn cell_cursor_style() -> Style {
    Style::default().bg(BG_SELECT).fg(ACCENT)
}

/// Style for transient copy acknowledgments.
pub fn copied_style() -> Style {
    Style::default().fg(OK).add_modifier(Modifier::BOLD)
}

/// Style for error text.
pub fn warn_style() -> Style {
    Style::default().fg(WARN)
}
