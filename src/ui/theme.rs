//! Theme and styling configuration.

use ratatui::style::{Color, Modifier, Style};

use crate::api::TagType;

/// Accent color for focused widgets.
pub const ACCENT: Color = Color::Yellow;

/// Color of secondary text (counts, hints, placeholders).
pub const MUTED: Color = Color::DarkGray;

/// Background of the focused row in a list.
pub const SELECTED_BG: Color = Color::DarkGray;

/// Text color for a tag of the given category.
///
/// Categories without a dedicated color use the terminal default.
pub const fn tag_color(tag_type: TagType) -> Color {
    match tag_type {
        TagType::Artist => Color::Yellow,
        TagType::Copyright => Color::Magenta,
        TagType::Character => Color::Green,
        TagType::Circle => Color::Cyan,
        TagType::Faults => Color::Red,
        TagType::General | TagType::Unknown(_) => Color::Reset,
    }
}

/// Style for the part of a suggestion that matches the typed token.
pub fn match_style(base: Style) -> Style {
    base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}
