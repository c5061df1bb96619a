//! Event handling for the application.
//!
//! Terminal input is converted into [`Event`]s; API results arrive separately
//! through the task channel (see `tasks`).

mod handler;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;

/// An application event produced by the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// Text pasted in one piece (bracketed paste).
    Paste(String),
    /// The terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// The terminal window lost focus.
    FocusLost,
    /// No input within the tick rate.
    Tick,
}
