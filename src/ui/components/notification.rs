//! Toast notifications for search and preview feedback.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::error::AppError;

/// Severity of a notification, which determines its appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Error,
}

impl NotificationType {
    fn icon(self) -> &'static str {
        match self {
            NotificationType::Info => "ℹ",
            NotificationType::Error => "✗",
        }
    }

    fn color(self) -> Color {
        match self {
            NotificationType::Info => Color::Blue,
            NotificationType::Error => Color::Red,
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            NotificationType::Info => Duration::from_secs(3),
            NotificationType::Error => Duration::from_secs(6),
        }
    }
}

/// A single notification message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationType,
    expires_at: Instant,
}

impl Notification {
    fn new(message: String, kind: NotificationType, now: Instant) -> Self {
        Self {
            message,
            kind,
            expires_at: now + kind.lifetime(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Stack of visible notifications, newest last.
#[derive(Debug)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    max_visible: usize,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_visible: 3,
        }
    }
}

impl NotificationManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    fn push_at(&mut self, message: String, kind: NotificationType, now: Instant) {
        // Repeated failures (e.g. paging through a dead board) refresh the
        // existing toast instead of stacking copies.
        if let Some(last) = self.notifications.back_mut() {
            if last.message == message && last.kind == kind {
                *last = Notification::new(message, kind, now);
                return;
            }
        }

        self.notifications
            .push_back(Notification::new(message, kind, now));
        while self.notifications.len() > self.max_visible {
            self.notifications.pop_front();
        }
    }

    /// Show an informational message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push_at(message.into(), NotificationType::Info, Instant::now());
    }

    /// Show an error message.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(message.into(), NotificationType::Error, Instant::now());
    }

    /// Show an application error with its suggested action, if any.
    pub fn app_error(&mut self, error: &AppError) {
        let message = match error.suggested_action() {
            Some(action) => format!("{} {}", error.user_message(), action),
            None => error.user_message(),
        };
        self.error(message);
    }

    /// Drop expired notifications. Call once per tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.notifications.retain(|n| !n.is_expired(now));
    }

    /// Whether nothing is shown.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Iterate over visible notifications, oldest first.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Render the stack in the bottom-right corner of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 50.min(area.width.saturating_sub(4));
        let inner = usize::from(width.saturating_sub(4)).max(1);
        let mut bottom = area.bottom().saturating_sub(1);

        for notification in self.notifications.iter().rev() {
            let text_len = notification.message.chars().count() + 2;
            let height = ((text_len + inner - 1) / inner) as u16 + 2;
            if bottom < area.y + height {
                break;
            }
            bottom -= height;
            let rect = Rect::new(area.right().saturating_sub(width + 2), bottom, width, height);
            render_notification(notification, frame, rect);
        }
    }
}

fn render_notification(notification: &Notification, frame: &mut Frame, area: Rect) {
    let style = Style::default().fg(notification.kind.color());
    let text = Line::from(vec![
        Span::styled(
            format!("{} ", notification.kind.icon()),
            style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(notification.message.as_str(), style),
    ]);

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
