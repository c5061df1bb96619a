//! Search result list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::api::Post;
use crate::ui::theme;

/// Actions that can be returned from the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsAction {
    /// Preview the post at this index.
    Preview(usize),
    NextPage,
    PrevPage,
    /// Run the current search again.
    Reload,
    /// Return to the previous search.
    Back,
}

/// The result list view.
#[derive(Debug, Default)]
pub struct ResultsView {
    posts: Vec<Post>,
    /// Currently selected index.
    selected: usize,
    loading: bool,
    state: TableState,
}

impl ResultsView {
    /// Create an empty result list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a search as in flight.
    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    /// Whether a search is in flight.
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the posts and select the first one.
    pub fn set_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.selected = 0;
        self.loading = false;
    }

    /// A search failed; keep the previous posts.
    pub fn set_failed(&mut self) {
        self.loading = false;
    }

    /// All posts on the page.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Currently selected index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select the post at `index`, clamped to the list.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.posts.len().saturating_sub(1));
    }

    /// The currently selected post.
    pub fn selected_post(&self) -> Option<&Post> {
        self.posts.get(self.selected)
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<ResultsAction> {
        let last = self.posts.len().saturating_sub(1);
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.selected = (self.selected + 1).min(last);
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
                self.selected = 0;
                None
            }
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
                self.selected = last;
                None
            }
            (KeyCode::Enter, _) if !self.posts.is_empty() => {
                Some(ResultsAction::Preview(self.selected))
            }
            (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
                Some(ResultsAction::NextPage)
            }
            (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
                Some(ResultsAction::PrevPage)
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(ResultsAction::Reload),
            (KeyCode::Backspace, _) => Some(ResultsAction::Back),
            _ => None,
        }
    }

    /// Render the list.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused { theme::ACCENT } else { theme::MUTED };
        let block = Block::default()
            .title(format!(" Posts ({}) ", self.posts.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        if self.posts.is_empty() {
            let message = if self.loading {
                "Searching..."
            } else {
                "No posts. Type tags above and press Enter."
            };
            let placeholder = Paragraph::new(Span::styled(message, Style::default().fg(theme::MUTED)))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let rows = self.posts.iter().map(|post| {
            Row::new(vec![
                post.id.to_string(),
                post.rating.short().to_string(),
                post.score.to_string(),
                format!("{}x{}", post.width, post.height),
                post.tag_list().collect::<Vec<_>>().join(" "),
            ])
        });

        let header = Row::new(vec!["id", "r", "score", "size", "tags"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Length(9),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(theme::SELECTED_BG));

        self.state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64) -> Post {
        serde_json::from_value(serde_json::json!({ "id": id, "tags": "cat" })).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view_with(count: u64) -> ResultsView {
        let mut view = ResultsView::new();
        view.set_posts((1..=count).map(post).collect());
        view
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut view = view_with(3);
        view.handle_input(key(KeyCode::Up));
        assert_eq!(view.selected(), 0);

        for _ in 0..5 {
            view.handle_input(key(KeyCode::Char('j')));
        }
        assert_eq!(view.selected(), 2);
        assert_eq!(view.selected_post().map(|p| p.id), Some(3));
    }

    #[test]
    fn test_enter_previews_selected() {
        let mut view = view_with(3);
        view.handle_input(key(KeyCode::Down));
        assert_eq!(
            view.handle_input(key(KeyCode::Enter)),
            Some(ResultsAction::Preview(1))
        );
    }

    #[test]
    fn test_enter_on_empty_list() {
        let mut view = ResultsView::new();
        assert_eq!(view.handle_input(key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_paging_keys() {
        let mut view = view_with(1);
        assert_eq!(view.handle_input(key(KeyCode::Char('n'))), Some(ResultsAction::NextPage));
        assert_eq!(view.handle_input(key(KeyCode::Char('p'))), Some(ResultsAction::PrevPage));
    }

    #[test]
    fn test_select_is_clamped() {
        let mut view = view_with(3);
        view.select(7);
        assert_eq!(view.selected(), 2);
        view.select(1);
        assert_eq!(view.selected_post().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_reload_and_back_keys() {
        let mut view = view_with(1);
        assert_eq!(view.handle_input(key(KeyCode::Char('r'))), Some(ResultsAction::Reload));
        assert_eq!(view.handle_input(key(KeyCode::Backspace)), Some(ResultsAction::Back));
    }

    #[test]
    fn test_set_posts_resets_selection_and_loading() {
        let mut view = view_with(3);
        view.handle_input(key(KeyCode::End));
        view.set_loading();
        assert!(view.is_loading());

        view.set_posts(vec![post(9)]);
        assert_eq!(view.selected(), 0);
        assert!(!view.is_loading());
    }

    #[test]
    fn test_failure_keeps_posts() {
        let mut view = view_with(2);
        view.set_loading();
        view.set_failed();
        assert_eq!(view.posts().len(), 2);
        assert!(!view.is_loading());
    }
}
