// Centralized palette - edit this file to change the look.

use ratatui::style::{Color, Modifier, Style};

/// Primary text - off-white for readability.
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);

/// Secondary/muted text.
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);

/// Selected row background.
pub const BG_SELECTED: Color = Color::Rgb(32, 32, 32);

/// Interactive accents, focus.
pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);

/// Success / resolved.
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);

/// Warnings / pending.
pub const ACCENT_WARNING: Color = Color::Rgb(206, 145, 120);

/// Errors.
pub const ACCENT_ERROR: Color = Color::Rgb(224, 108, 117);

pub fn title() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn selected_row() -> Style {
    Style::default().bg(BG_SELECTED).fg(TEXT_PRIMARY)
}
