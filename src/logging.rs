//! Logging configuration using the tracing ecosystem.
//!
//! Output goes to a daily rotating file so it never corrupts the TUI.
//! `RUST_LOG` wins over the `-v` flags when set.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, fmt::format::FmtSpan, prelude::*};

/// Filter used when `RUST_LOG` is not set, by number of `-v` flags.
///
/// - 0: app events at `info`, dependencies at `warn`
/// - 1: app at `debug`: scheduled lookups, staleness drops, navigation
/// - 2+: also debounce cancellations and request timing at `trace`
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "lazybooru=info,warn",
        1 => "lazybooru=debug,warn",
        _ => "lazybooru=debug,lazybooru::autocomplete=trace,lazybooru::api=trace,reqwest=debug,warn",
    }
}

/// Initialize the logging system.
///
/// # Log Directory
///
/// Logs are stored in the platform-specific local data directory:
/// - Linux: `~/.local/share/lazybooru/logs/`
/// - macOS: `~/Library/Application Support/lazybooru/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\lazybooru\logs\`
///
/// Tag lookups and image downloads run inside spans (`tag_lookup`,
/// `fetch_image`); closing a span logs how long it took.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or if a global subscriber is already installed.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "lazybooru.log");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lazybooru starting up");
    tracing::debug!(log_dir = %log_dir.display(), verbosity, "Log directory");

    Ok(())
}

/// Platform local data directory with `lazybooru/logs` appended.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("lazybooru").join("logs"))
}

/// Get the path where logs are stored, for display to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

/// Log application shutdown.
pub fn shutdown() {
    tracing::info!("lazybooru shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("lazybooru/logs"));
        }
    }

    #[test]
    fn test_default_filters_parse() {
        for verbosity in 0..=3 {
            let directives = default_filter(verbosity);
            assert!(
                EnvFilter::try_new(directives).is_ok(),
                "bad filter for -{}: {}",
                "v".repeat(usize::from(verbosity)),
                directives
            );
        }
    }

    #[test]
    fn test_verbosity_raises_app_level() {
        assert!(default_filter(0).starts_with("lazybooru=info"));
        assert!(default_filter(1).starts_with("lazybooru=debug"));
        assert!(default_filter(2).contains("lazybooru::autocomplete=trace"));
        assert_eq!(default_filter(2), default_filter(9));
    }
}
