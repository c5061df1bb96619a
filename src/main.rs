//! lazybooru - a terminal browser for Moebooru-style image boards.
//!
//! Type tags to search with live suggestions, page through the results and
//! preview images scaled to the terminal.

mod api;
mod app;
mod autocomplete;
mod config;
mod error;
mod events;
mod logging;
mod navigation;
mod preview;
mod tasks;
mod tui;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use crate::api::BooruClient;
use crate::app::App;
use crate::config::Config;
use crate::error::AppError;
use crate::events::EventHandler;
use crate::navigation::SearchParams;
use crate::tasks::create_task_channel;

/// Terminal browser for Moebooru-style image boards.
#[derive(Parser, Debug)]
#[command(name = "lazybooru", version, about)]
struct Cli {
    /// Initial search as a query string, e.g. "tags=cat_ears&page=2".
    #[arg(long)]
    query: Option<String>,

    /// Initial tags, separated by spaces.
    #[arg(long)]
    tags: Option<String>,

    /// Initial page number.
    #[arg(long)]
    page: Option<u32>,

    /// Posts per page.
    #[arg(long)]
    limit: Option<u32>,

    /// Board to browse (overrides the config file).
    #[arg(long)]
    base_url: Option<String>,

    /// Path to an alternative config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,

    /// More detailed logs (-v debug, -vv trace for lookups and requests).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    let result = run(cli).await;
    logging::shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            if let Some(dir) = logging::log_directory() {
                eprintln!("details are logged in {}", dir.display());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, client, params) = match prepare(&cli) {
        Ok(parts) => parts,
        Err(e) => {
            error!(critical = e.is_critical(), "Startup failed: {}", e);
            let message = match e.suggested_action() {
                Some(action) => format!("{} {}", e.user_message(), action),
                None => e.user_message(),
            };
            anyhow::bail!(message);
        }
    };

    if cli.write_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        config.save_to(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let tick_rate = config.settings.tick_rate_ms;
    let (mut rx, spawner) = create_task_channel();
    let mut app = App::new(config, client, spawner, params);

    let (_guard, mut terminal) = tui::init().context("failed to set up the terminal")?;
    let events = EventHandler::with_tick_rate(tick_rate);

    app.start();
    while !app.should_quit() {
        while let Ok(message) = rx.try_recv() {
            app.handle_message(message);
        }

        terminal
            .draw(|frame| app.view(frame))
            .context("failed to draw")?;

        // Polling blocks for up to one tick; let other tasks use this worker.
        let event = tokio::task::block_in_place(|| events.next())
            .context("failed to read terminal input")?;
        app.update(event);
    }

    Ok(())
}

/// Load the configuration, apply command-line overrides and build the client.
fn prepare(cli: &Cli) -> Result<(Config, BooruClient, SearchParams), AppError> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.settings.base_url = base_url.clone();
    }
    if let Some(limit) = cli.limit {
        config.settings.page_limit = limit;
    }
    config.validate()?;

    let mut params = match &cli.query {
        Some(query) => SearchParams::from_query_string(query),
        None => SearchParams::default(),
    };
    if cli.query.is_none() || cli.limit.is_some() {
        params.limit = config.settings.page_limit;
    }
    if let Some(tags) = &cli.tags {
        params = params.with_tags(tags.clone());
    }
    if let Some(page) = cli.page {
        params = params.with_page(page);
    }

    let client = BooruClient::new(&config.settings.base_url)?;
    info!(board = %client.base_url(), search = %params.to_query_string(), "Configured");
    Ok((config, client, params))
}
