use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod handler;
mod tui;
mod ui;

use app::{App, ReaderOptions, ReaderState};
use tui::{EventHandler, Tui, TICK_RATE};
use verse_view::{load_chapter, Config, Messages, VerseWidgets};

#[derive(Parser)]
#[command(name = "verses")]
#[command(about = "Read a chapter verse by verse, with audio, bookmarks and sharing")]
#[command(version)]
struct Cli {
    /// Chapter data file (JSON)
    data: PathBuf,
    /// Only show verses whose translations contain this text
    #[arg(short, long)]
    search: Option<String>,
    /// Present verses as search results
    #[arg(long)]
    searched: bool,
    /// Present verses for PDF export (no audio, copy or share)
    #[arg(long)]
    pdf: bool,
    /// Message catalogue for the interface language (JSON)
    #[arg(short, long)]
    locale: Option<PathBuf>,
    /// Config file [default: user config dir]
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;

    let log_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    init_tracing(&log_dir, &config.log_level)?;

    let data = load_chapter(&cli.data).await?;
    let messages = load_messages(cli.locale.as_deref().or(config.locale_file.as_deref()));
    let widgets = VerseWidgets::system(&config.share_base_url);

    let options = ReaderOptions {
        search: cli.search,
        searched: cli.searched,
        pdf: cli.pdf,
    };
    let state = ReaderState::new(data, config, config_path, &options);
    let mut app = App::new(state, widgets, messages);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.state.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
        app.drain_actions();
    }

    tracing::info!("Reader closed");
    Ok(())
}

/// Log to a file next to the config; the terminal belongs to the UI
fn init_tracing(log_dir: &Path, level: &str) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("verses.log");
    let file = File::create(&log_path)
        .with_context(|| format!("Failed to create {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter),
        )
        .init();
    tracing::info!(path = %log_path.display(), "Logging initialized; override level with config.log_level or RUST_LOG");
    Ok(())
}

fn load_messages(path: Option<&Path>) -> Messages {
    let Some(path) = path else {
        return Messages::default();
    };
    match Messages::load(path) {
        Ok(messages) => {
            tracing::info!(entries = messages.len(), "Loaded messages from {}", path.display());
            messages
        }
        Err(e) => {
            tracing::warn!("Falling back to default messages: {:#}", e);
            Messages::default()
        }
    }
}
