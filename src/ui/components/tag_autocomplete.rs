//! Search field with incremental tag suggestions.
//!
//! Typing edits a whitespace-tokenized query. After the input has been quiet
//! for the debounce period, the last token is looked up and matching tags
//! appear in a floating panel under the field. Picking a suggestion replaces
//! only that last token.
//!
//! Lookups are identified by a monotonically increasing id. Any change that
//! makes the current list obsolete (an edit, a selection, Escape, blur) bumps
//! the id, so a completion arriving late for an older id is ignored.

use std::future::Future;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};
use tracing::{debug, warn};

use super::TextInput;
use crate::api::Tag;
use crate::autocomplete::{highlight, Debouncer, LookupRequest, Query, Segment};
use crate::ui::theme;

/// Default form field name.
pub const DEFAULT_FIELD_NAME: &str = "tags";

/// Most rows the suggestion panel shows at once.
const MAX_PANEL_ROWS: u16 = 10;

/// Actions returned to the owner of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteAction {
    /// Run this lookup once the input is quiet (see [`TagAutocomplete::schedule`]).
    Lookup(LookupRequest),
    /// The user submitted the query.
    Commit(String),
    /// Escape on a closed panel: the user wants to leave the field.
    Blur,
}

/// Visibility of the suggestion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Where keyboard input goes inside the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The text field.
    #[default]
    Input,
    /// The suggestion at this index.
    Suggestion(usize),
}

/// Tag search field with a suggestion panel.
#[derive(Debug)]
pub struct TagAutocomplete {
    /// Form field name reported by [`field`](Self::field).
    name: String,
    input: TextInput,
    query: Query,
    suggestions: Vec<Tag>,
    panel: PanelState,
    focus: Focus,
    /// Id of the only lookup whose result may still be applied.
    latest_request: u64,
    debouncer: Debouncer,
}

impl TagAutocomplete {
    /// Create a field holding `default_value`.
    pub fn new(default_value: &str, quiet_period: Duration) -> Self {
        let query = Query::parse(default_value);
        let mut input = TextInput::with_value(query.text());
        input.set_placeholder("Type tags to search...");

        Self {
            name: DEFAULT_FIELD_NAME.to_string(),
            input,
            query,
            suggestions: Vec::new(),
            panel: PanelState::Closed,
            focus: Focus::Input,
            latest_request: 0,
            debouncer: Debouncer::new(quiet_period),
        }
    }

    /// Set the form field name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The `(name, value)` pair submitted with a form.
    pub fn field(&self) -> (&str, String) {
        (&self.name, self.query.text())
    }

    /// The query text as displayed.
    #[cfg(test)]
    pub fn value(&self) -> String {
        self.query.text()
    }

    /// The token autocomplete works on.
    pub fn active_token(&self) -> &str {
        self.query.active_token()
    }

    /// Current suggestions, in the order the tag index returned them.
    #[cfg(test)]
    pub fn suggestions(&self) -> &[Tag] {
        &self.suggestions
    }

    /// Whether the suggestion panel is visible.
    pub fn is_open(&self) -> bool {
        self.panel == PanelState::Open
    }

    /// Current panel state.
    #[cfg(test)]
    pub fn panel(&self) -> PanelState {
        self.panel
    }

    /// Current keyboard focus.
    #[cfg(test)]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether a debounced lookup is armed.
    #[cfg(test)]
    pub fn is_lookup_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Replace the text from outside (e.g. history navigation).
    ///
    /// Does not look anything up.
    pub fn set_value(&mut self, value: &str) {
        self.query = Query::parse(value);
        self.input.set_value(self.query.text());
        self.invalidate();
        self.close();
    }

    /// Arm the debounce timer with the lookup for a `Lookup` action.
    ///
    /// Replaces any lookup still waiting for the quiet period. Requires a
    /// tokio runtime.
    pub fn schedule<F>(&mut self, lookup: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.debouncer.schedule(lookup);
    }

    /// Apply the result of a lookup.
    ///
    /// Returns `false` when the result belongs to a superseded request and
    /// was dropped.
    pub fn apply_lookup(
        &mut self,
        request: &LookupRequest,
        result: Result<Vec<Tag>, String>,
    ) -> bool {
        if request.id != self.latest_request {
            debug!(
                id = request.id,
                latest = self.latest_request,
                "Dropping stale tag lookup"
            );
            return false;
        }

        match result {
            Ok(tags) => {
                let trivial = tags.len() == 1 && tags[0].name == request.token;
                self.panel = if tags.is_empty() || trivial {
                    PanelState::Closed
                } else {
                    PanelState::Open
                };
                self.suggestions = tags;
                debug!(
                    token = %request.token,
                    count = self.suggestions.len(),
                    open = self.is_open(),
                    "Applied tag lookup"
                );
            }
            Err(e) => {
                warn!(token = %request.token, "Tag lookup failed: {}", e);
                self.suggestions.clear();
                self.panel = PanelState::Closed;
            }
        }

        self.focus = match self.focus {
            Focus::Suggestion(i) if self.is_open() => {
                Focus::Suggestion(i.min(self.suggestions.len() - 1))
            }
            _ => Focus::Input,
        };
        true
    }

    /// The field lost focus: close the panel and forget pending lookups.
    pub fn blur(&mut self) {
        self.invalidate();
        self.close();
    }

    /// Replace the active token with suggestion `index`.
    ///
    /// Earlier tokens are kept; the panel closes and focus returns to the
    /// text field. No new lookup is issued.
    pub fn select(&mut self, index: usize) {
        let Some(tag) = self.suggestions.get(index) else {
            return;
        };
        self.query.replace_active(&tag.name);
        self.input.set_value(self.query.text());
        debug!(tag = %tag.name, "Selected suggestion");
        self.invalidate();
        self.close();
    }

    /// Handle pasted text as a single edit.
    pub fn handle_paste(&mut self, text: &str) -> Option<AutocompleteAction> {
        self.focus = Focus::Input;
        self.input.insert_str(text);
        self.text_changed()
    }

    /// Handle keyboard input.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<AutocompleteAction> {
        match self.focus {
            Focus::Input => self.handle_field_key(key),
            Focus::Suggestion(index) => self.handle_suggestion_key(index, key),
        }
    }

    fn handle_field_key(&mut self, key: KeyEvent) -> Option<AutocompleteAction> {
        match key.code {
            KeyCode::Enter => {
                self.invalidate();
                self.close();
                let committed = self.query.tags().collect::<Vec<_>>().join(" ");
                Some(AutocompleteAction::Commit(committed))
            }
            KeyCode::Esc => {
                let was_open = self.is_open();
                self.invalidate();
                self.close();
                (!was_open).then_some(AutocompleteAction::Blur)
            }
            KeyCode::Down => {
                if self.has_visible_suggestions() {
                    self.focus = Focus::Suggestion(0);
                }
                None
            }
            KeyCode::Up => {
                if self.has_visible_suggestions() {
                    self.focus = Focus::Suggestion(self.suggestions.len() - 1);
                }
                None
            }
            _ => {
                if self.input.handle_input(key) {
                    self.text_changed()
                } else {
                    None
                }
            }
        }
    }

    fn handle_suggestion_key(
        &mut self,
        index: usize,
        key: KeyEvent,
    ) -> Option<AutocompleteAction> {
        match key.code {
            KeyCode::Down => {
                let last = self.suggestions.len().saturating_sub(1);
                self.focus = Focus::Suggestion((index + 1).min(last));
                None
            }
            KeyCode::Up => {
                self.focus = match index {
                    0 => Focus::Input,
                    i => Focus::Suggestion(i - 1),
                };
                None
            }
            KeyCode::Enter => {
                self.select(index);
                None
            }
            KeyCode::Esc => {
                self.invalidate();
                self.close();
                None
            }
            _ => {
                self.focus = Focus::Input;
                self.handle_field_key(key)
            }
        }
    }

    /// Re-tokenize after an edit and request a lookup for the new token.
    fn text_changed(&mut self) -> Option<AutocompleteAction> {
        self.query = Query::parse(self.input.value());
        let normalized = self.query.text();
        if normalized != self.input.value() {
            // Collapsed separators left of the cursor shift it left too.
            let cursor = Query::parse(self.input.before_cursor())
                .text()
                .chars()
                .count();
            self.input.replace_value(normalized, cursor);
        }

        self.invalidate();

        let token = self.query.active_token();
        if token.is_empty() {
            self.suggestions.clear();
            self.close();
            return None;
        }

        Some(AutocompleteAction::Lookup(LookupRequest {
            id: self.latest_request,
            token: token.to_string(),
        }))
    }

    /// Cancel the pending timer and retire the current request id.
    fn invalidate(&mut self) {
        self.debouncer.cancel();
        self.latest_request += 1;
    }

    fn close(&mut self) {
        self.panel = PanelState::Closed;
        self.focus = Focus::Input;
    }

    fn has_visible_suggestions(&self) -> bool {
        self.is_open() && !self.suggestions.is_empty()
    }

    /// Render the field in `area` and, when open, the panel below it.
    ///
    /// The panel floats over whatever was drawn before, clipped to `bounds`.
    pub fn render(&self, frame: &mut Frame, area: Rect, bounds: Rect, focused: bool) {
        let field_focused = focused && self.focus == Focus::Input;
        self.input.render_with_label(frame, area, "Tags", field_focused);

        if focused && self.has_visible_suggestions() {
            self.render_panel(frame, area, bounds);
        }
    }

    fn render_panel(&self, frame: &mut Frame, field: Rect, bounds: Rect) {
        let top = field.bottom();
        let available = bounds.bottom().saturating_sub(top);
        let rows = (self.suggestions.len() as u16).min(MAX_PANEL_ROWS);
        let height = (rows + 2).min(available);
        if height < 3 {
            return;
        }
        let panel = Rect::new(field.x, top, field.width, height);
        let inner_width = usize::from(panel.width.saturating_sub(2));

        let token = self.active_token();
        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .map(|tag| ListItem::new(suggestion_line(tag, token, inner_width)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme::ACCENT)),
            )
            .highlight_style(Style::default().bg(theme::SELECTED_BG));

        let mut state = ListState::default();
        if let Focus::Suggestion(i) = self.focus {
            state.select(Some(i));
        }

        frame.render_widget(Clear, panel);
        frame.render_stateful_widget(list, panel, &mut state);
    }
}

/// One panel row: the highlighted name on the left, the post count on the right.
fn suggestion_line(tag: &Tag, token: &str, width: usize) -> Line<'static> {
    let base = Style::default().fg(theme::tag_color(tag.tag_type));
    let mut spans: Vec<Span<'static>> = highlight(&tag.name, token)
        .into_iter()
        .map(|segment| match segment {
            Segment::Match(text) => Span::styled(text, theme::match_style(base)),
            Segment::Plain(text) => Span::styled(text, base),
        })
        .collect();

    let count = tag.count.to_string();
    let used = tag.name.chars().count() + count.chars().count();
    let gap = width.saturating_sub(used).max(1);
    spans.push(Span::raw(" ".repeat(gap)));
    spans.push(Span::styled(count, Style::default().fg(theme::MUTED)));

    Line::from(spans)
}
