//! Main application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: terminal
//! [`Event`]s and background [`ApiMessage`]s update the state, and
//! [`App::view`] renders it.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::api::{ApiError, BooruClient, Post};
use crate::config::Config;
use crate::error::AppError;
use crate::events::Event;
use crate::navigation::{Navigator, SearchParams, POST_PATH, TAGS_PARAM};
use crate::tasks::{ApiMessage, TaskSpawner};
use crate::ui::{
    theme, AutocompleteAction, NotificationManager, PageAction, PageInput, PreviewAction,
    PreviewView, ResultsAction, ResultsView, TagAutocomplete,
};

/// Which part of the screen receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    /// The tag search field.
    #[default]
    Search,
    /// The result list.
    Results,
    /// The page-number field.
    Page,
    /// The image preview popup.
    Preview,
}

impl Pane {
    fn next(self) -> Self {
        match self {
            Pane::Search => Pane::Results,
            Pane::Results => Pane::Page,
            Pane::Page | Pane::Preview => Pane::Search,
        }
    }

    fn prev(self) -> Self {
        match self {
            Pane::Search => Pane::Page,
            Pane::Results | Pane::Preview => Pane::Search,
            Pane::Page => Pane::Results,
        }
    }
}

/// The main application struct that holds all state.
pub struct App {
    config: Config,
    client: BooruClient,
    spawner: TaskSpawner,
    navigator: Navigator,
    search: TagAutocomplete,
    results: ResultsView,
    pager: PageInput,
    /// The open preview popup, if any.
    preview: Option<PreviewView>,
    notifications: NotificationManager,
    pane: Pane,
    should_quit: bool,
    /// Number of posts the current page returned, once it has loaded.
    page_len: Option<usize>,
}

impl App {
    /// Create the application at the search described by `params`.
    ///
    /// Nothing is fetched until [`start`](Self::start).
    pub fn new(
        config: Config,
        client: BooruClient,
        spawner: TaskSpawner,
        params: SearchParams,
    ) -> Self {
        debug!(params = %params.to_query_string(), "Creating application");
        let quiet_period = Duration::from_millis(config.settings.quiet_period_ms);

        Self {
            search: TagAutocomplete::new(&params.tags, quiet_period).with_name(TAGS_PARAM),
            pager: PageInput::new(params.page),
            navigator: Navigator::new(POST_PATH, params),
            results: ResultsView::new(),
            preview: None,
            notifications: NotificationManager::new(),
            pane: Pane::Search,
            should_quit: false,
            page_len: None,
            config,
            client,
            spawner,
        }
    }

    /// Run the search for the initial history entry.
    pub fn start(&mut self) {
        info!(url = %self.navigator.current(), "Initial search");
        self.load_current();
    }

    /// Returns true if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The pane receiving keyboard input.
    #[cfg(test)]
    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Search history.
    #[cfg(test)]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// The tag search field.
    #[cfg(test)]
    pub fn search(&self) -> &TagAutocomplete {
        &self.search
    }

    /// The result list.
    #[cfg(test)]
    pub fn results(&self) -> &ResultsView {
        &self.results
    }

    /// The open preview, if any.
    #[cfg(test)]
    pub fn preview(&self) -> Option<&PreviewView> {
        self.preview.as_ref()
    }

    /// Toast notifications.
    #[cfg(test)]
    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    /// Whether the next-page button is enabled.
    ///
    /// A page shorter than the limit is the last one.
    pub fn has_next_page(&self) -> bool {
        let params = self.navigator.params();
        let full = self
            .page_len
            .map_or(false, |len| len >= params.limit as usize);
        full && params.page.checked_add(1).is_some()
    }

    /// Whether the previous-page button is enabled.
    pub fn has_prev_page(&self) -> bool {
        self.navigator.params().has_prev_page()
    }

    /// Update the application state based on a terminal event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                self.handle_key_event(key);
            }
            Event::Paste(text) => {
                if self.pane == Pane::Search {
                    let action = self.search.handle_paste(&text);
                    self.handle_search_action(action);
                }
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::FocusLost => {
                debug!("Terminal lost focus");
                self.search.blur();
            }
            Event::Tick => self.notifications.tick(),
        }
    }

    /// Apply the result of a background task.
    pub fn handle_message(&mut self, message: ApiMessage) {
        match message {
            ApiMessage::TagsFetched { request, result } => {
                self.search.apply_lookup(&request, result);
            }
            ApiMessage::PostsFetched { params, result } => self.apply_posts(params, result),
            ApiMessage::ImageFetched { post_id, result } => {
                let Some(preview) = self.preview.as_mut().filter(|p| p.post().id == post_id)
                else {
                    debug!(post_id, "Dropping image for a closed preview");
                    return;
                };
                match result {
                    Ok(image) => {
                        debug!(
                            post_id,
                            width = image.width(),
                            height = image.height(),
                            "Image ready"
                        );
                        preview.set_image(image);
                    }
                    Err(e) => {
                        let error = AppError::from(e);
                        warn!(post_id, "Image fetch failed: {}", error);
                        preview.set_failed(error.user_message());
                    }
                }
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        if self.pane != Pane::Preview {
            let target = match key.code {
                KeyCode::Tab => Some(self.pane.next()),
                KeyCode::BackTab => Some(self.pane.prev()),
                _ => None,
            };
            if let Some(pane) = target {
                self.focus(pane);
                return;
            }
        }

        match self.pane {
            Pane::Search => {
                let action = self.search.handle_input(key);
                self.handle_search_action(action);
            }
            Pane::Results => self.handle_results_key(key),
            Pane::Page => {
                if let Some(action) = self.pager.handle_input(key) {
                    self.handle_page_action(action);
                }
            }
            Pane::Preview => {
                let action = self.preview.as_mut().and_then(|p| p.handle_input(key));
                if let Some(action) = action {
                    self.handle_preview_action(action);
                }
            }
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => self.quit(),
            (KeyCode::Char('/'), _) => self.focus(Pane::Search),
            (KeyCode::Left, KeyModifiers::ALT) => self.go_back(),
            (KeyCode::Right, KeyModifiers::ALT) => self.go_forward(),
            _ => {
                if let Some(action) = self.results.handle_input(key) {
                    self.handle_results_action(action);
                }
            }
        }
    }

    fn handle_search_action(&mut self, action: Option<AutocompleteAction>) {
        match action {
            None => {}
            Some(AutocompleteAction::Lookup(request)) => {
                let limit = self.config.settings.suggestion_limit;
                let lookup = self.spawner.tag_lookup(&self.client, request, limit);
                self.search.schedule(lookup);
            }
            Some(AutocompleteAction::Commit(tags)) => {
                let (field, value) = self.search.field();
                debug!(field, value = %value, "Search submitted");
                let params = self.navigator.params().with_tags(tags);
                self.navigate(params);
                self.focus(Pane::Results);
            }
            Some(AutocompleteAction::Blur) => self.focus(Pane::Results),
        }
    }

    fn handle_results_action(&mut self, action: ResultsAction) {
        match action {
            ResultsAction::Preview(index) => self.open_preview(index),
            ResultsAction::NextPage => {
                if self.has_next_page() {
                    let params = self.navigator.params();
                    if let Some(page) = params.page.checked_add(1) {
                        let next = params.with_page(page);
                        self.navigate(next);
                    }
                }
            }
            ResultsAction::PrevPage => {
                if self.has_prev_page() {
                    let params = self.navigator.params();
                    let prev = params.with_page(params.page - 1);
                    self.navigate(prev);
                }
            }
            ResultsAction::Reload => self.load_current(),
            ResultsAction::Back => self.go_back(),
        }
    }

    fn handle_page_action(&mut self, action: PageAction) {
        let current = self.navigator.params().page;
        match action {
            PageAction::Go(page) if page != current => {
                let params = self.navigator.params().with_page(page);
                self.navigate(params);
            }
            PageAction::Go(_) | PageAction::Cancel => self.pager.sync(current),
        }
        self.focus(Pane::Results);
    }

    fn handle_preview_action(&mut self, action: PreviewAction) {
        let selected = self.results.selected();
        match action {
            PreviewAction::Close => {
                self.preview = None;
                self.pane = Pane::Results;
            }
            PreviewAction::Next if selected + 1 < self.results.posts().len() => {
                self.open_preview(selected + 1);
            }
            PreviewAction::Prev if selected > 0 => self.open_preview(selected - 1),
            PreviewAction::Next | PreviewAction::Prev => {}
        }
    }

    fn focus(&mut self, pane: Pane) {
        if self.pane == Pane::Search && pane != Pane::Search {
            self.search.blur();
        }
        self.pane = pane;
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.should_quit = true;
    }

    /// Push `params` onto the history and search for them.
    fn navigate(&mut self, params: SearchParams) {
        let entry = self.navigator.push(POST_PATH, params);
        info!(url = %entry, "Searching");
        self.load_current();
    }

    fn go_back(&mut self) {
        if self.navigator.back().is_some() {
            self.restore_current();
        }
    }

    fn go_forward(&mut self) {
        if self.navigator.forward().is_some() {
            self.restore_current();
        }
    }

    /// Show the current history entry again after moving through history.
    fn restore_current(&mut self) {
        debug!(url = %self.navigator.current(), "Restoring history entry");
        let tags = self.navigator.params().tags.clone();
        self.search.set_value(&tags);
        self.load_current();
    }

    fn load_current(&mut self) {
        let params = self.navigator.params().clone();
        self.pager.sync(params.page);
        self.page_len = None;
        self.results.set_loading();
        self.spawner.spawn_search_posts(&self.client, params);
    }

    fn apply_posts(&mut self, params: SearchParams, result: Result<Vec<Post>, ApiError>) {
        if &params != self.navigator.params() {
            debug!(params = %params.to_query_string(), "Dropping results for an old search");
            return;
        }

        match result {
            Ok(posts) => {
                info!(count = posts.len(), page = params.page, "Search finished");
                if posts.is_empty() {
                    self.notifications.info("No posts found");
                }
                self.page_len = Some(posts.len());
                self.results.set_posts(posts);
            }
            Err(e) => {
                let error = AppError::from(e);
                warn!(recoverable = error.is_recoverable(), "Search failed: {}", error);
                self.results.set_failed();
                self.notifications.app_error(&error);
            }
        }
    }

    fn open_preview(&mut self, index: usize) {
        self.results.select(index);
        let Some(post) = self.results.selected_post().cloned() else {
            return;
        };
        let Some(url) = post.preview_source().map(str::to_string) else {
            self.notifications.error(format!("Post #{} has no image", post.id));
            return;
        };

        debug!(post_id = post.id, %url, "Opening preview");
        self.spawner.spawn_fetch_image(&self.client, post.id, url);
        self.preview = Some(PreviewView::new(post));
        self.pane = Pane::Preview;
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search field and pager
                Constraint::Min(1),    // Results
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(16)])
            .split(chunks[0]);

        self.results
            .render(frame, chunks[1], self.pane == Pane::Results);
        self.pager.render(
            frame,
            top[1],
            self.has_prev_page(),
            self.has_next_page(),
            self.pane == Pane::Page,
        );
        self.render_footer(frame, chunks[2]);

        if let Some(preview) = self.preview.as_mut() {
            let settings = &self.config.preview;
            preview.render(frame, area, settings.viewport_fraction, settings.fit_policy());
        }

        self.notifications.render(frame, area);

        // Drawn last so the suggestion panel floats over the results.
        self.search
            .render(frame, top[0], area, self.pane == Pane::Search);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.pane {
            Pane::Search => "Enter search  ↓ suggestions  Esc close  Tab next",
            Pane::Results => "Enter preview  n/p page  r reload  Bksp back  / search  q quit",
            Pane::Page => "Enter go  Esc cancel  Tab next",
            Pane::Preview => "←/→ prev/next  Esc close",
        };

        let line = Line::from(vec![
            Span::styled(" lazybooru ", Style::default().fg(theme::ACCENT)),
            Span::styled(self.navigator.current().url(), Style::default()),
            Span::raw("  "),
            Span::styled(hints, Style::default().fg(theme::MUTED)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
