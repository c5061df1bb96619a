//! Pager: previous/next buttons around a page-number field.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use super::TextInput;
use crate::ui::theme;

/// Actions returned from the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    /// Jump to this page.
    Go(u32),
    /// Leave the field without changing page.
    Cancel,
}

/// Page-number field.
#[derive(Debug, Clone)]
pub struct PageInput {
    input: TextInput,
}

impl PageInput {
    /// Create a field showing `page`.
    pub fn new(page: u32) -> Self {
        Self {
            input: TextInput::with_value(page.to_string()),
        }
    }

    /// Show `page`, discarding anything typed.
    pub fn sync(&mut self, page: u32) {
        self.input.set_value(page.to_string());
    }

    /// The typed page, if it is a positive number.
    pub fn page(&self) -> Option<u32> {
        self.input.value().trim().parse().ok().filter(|&p| p > 0)
    }

    /// Handle keyboard input. Only digits are accepted.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<PageAction> {
        match key.code {
            KeyCode::Enter => self.page().map(PageAction::Go),
            KeyCode::Esc => Some(PageAction::Cancel),
            KeyCode::Char(c) if !c.is_ascii_digit() => None,
            _ => {
                self.input.handle_input(key);
                None
            }
        }
    }

    /// Render `‹ [page] ›`, dimming buttons that are disabled.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        has_prev: bool,
        has_next: bool,
        focused: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        let button = |label: &'static str, enabled: bool| {
            let style = if enabled {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::MUTED)
            };
            Paragraph::new(Span::styled(label, style)).alignment(Alignment::Center)
        };

        // Align the arrows with the text row inside the bordered field.
        let arrow_row = |rect: Rect| Rect {
            y: rect.y + rect.height.min(3) / 2,
            height: 1,
            ..rect
        };

        frame.render_widget(button("‹", has_prev), arrow_row(chunks[0]));
        self.input.render_with_label(frame, chunks[1], "Page", focused);
        frame.render_widget(button("›", has_next), arrow_row(chunks[2]));
    }
}
