//! Terminal event polling.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// Handles application events by polling crossterm for terminal events.
pub struct EventHandler {
    /// How long to wait for input before yielding `Event::Tick`.
    tick_rate: Duration,
}

impl EventHandler {
    /// Create an event handler ticking every `tick_rate_ms` milliseconds.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// Block until an event is available or the tick rate elapses.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(translate(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

/// Map a crossterm event onto an application event.
///
/// Key releases and repeats (reported by some terminals) become ticks.
fn translate(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Paste(text) => Event::Paste(text),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        CrosstermEvent::FocusLost => Event::FocusLost,
        CrosstermEvent::Key(_) | CrosstermEvent::FocusGained | CrosstermEvent::Mouse(_) => {
            Event::Tick
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_with_tick_rate() {
        let handler = EventHandler::with_tick_rate(50);
        assert_eq!(handler.tick_rate, Duration::from_millis(50));
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let handler = EventHandler::with_tick_rate(0);
        assert_eq!(handler.tick_rate, Duration::from_millis(1));
    }

    #[test]
    fn test_translate_key_press() {
        let press = key(KeyEventKind::Press);
        assert_eq!(translate(CrosstermEvent::Key(press)), Event::Key(press));
    }

    #[test]
    fn test_translate_ignores_release() {
        let release = key(KeyEventKind::Release);
        assert_eq!(translate(CrosstermEvent::Key(release)), Event::Tick);
    }

    #[test]
    fn test_translate_focus_and_paste() {
        assert_eq!(translate(CrosstermEvent::FocusLost), Event::FocusLost);
        assert_eq!(translate(CrosstermEvent::FocusGained), Event::Tick);
        assert_eq!(
            translate(CrosstermEvent::Paste("cat ears".to_string())),
            Event::Paste("cat ears".to_string())
        );
        assert_eq!(translate(CrosstermEvent::Resize(80, 24)), Event::Resize(80, 24));
    }
}
