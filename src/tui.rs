//! Terminal setup and teardown.

use std::io::{self, Stdout, Write};

use crossterm::{
    event::{DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::{AppError, Result};

/// The terminal type the application draws on.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Restores the terminal when dropped.
///
/// Enables raw mode, the alternate screen, bracketed paste and focus
/// reporting. A panic hook restores the terminal before the default hook
/// prints, so panic messages stay readable.
pub struct TerminalGuard;

impl TerminalGuard {
    fn setup() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableFocusChange
        )?;

        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore();
            default_hook(info);
        }));

        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            tracing::warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        DisableFocusChange,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    stdout.flush()
}

/// Prepare the terminal for drawing.
///
/// Keep the guard alive for as long as the terminal is in use.
pub fn init() -> Result<(TerminalGuard, Tui)> {
    let guard = TerminalGuard::setup().map_err(|e| AppError::terminal(e.to_string()))?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(|e| AppError::terminal(e.to_string()))?;
    Ok((guard, terminal))
}
