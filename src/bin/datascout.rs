use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{self, Event as CEvent};
use datascout::config::Config;
use datascout::services::{HttpAnalysisService, RequestDispatcher};
use datascout::terminal::{self, Tui};
use datascout::tui::{App, KeyBindings, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Terminal client for an AI data-analysis service: upload a dataset,
/// review its quality, then ask for a prediction in plain language
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Base URL of the analysis service (overrides service.base_url)
    #[arg(long = "api-url", value_name = "URL")]
    api_url: Option<String>,
    /// File to stage for analysis on startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    datascout::errors::init()?;
    datascout::logging::init_with(None, args.logging.map(tracing::Level::from))?;

    let mut config = Config::from_path(args.config.as_ref())?;
    if let Some(url) = args.api_url {
        config = config.with_base_url(url);
    }

    let keybindings = KeyBindings::with_overrides(&config.keybindings);
    for warning in keybindings.validate() {
        warn!("Keybindings: {warning}");
    }

    let service = HttpAnalysisService::from_config(&config.service)?;
    info!(
        "Using analysis service at {} / {}",
        service.analyze_url(),
        service.predict_url()
    );

    // Requests run here; the UI loop below stays synchronous
    let runtime = tokio::runtime::Runtime::new()?;
    let dispatcher = RequestDispatcher::new(Arc::new(service), runtime.handle().clone());
    let mut app = App::new(dispatcher, keybindings, Theme::from_name(config.ui.theme));

    if let Some(file) = &args.file {
        app.stage_path(file);
    }

    let mut terminal = terminal::init()?;
    let res = run_app(&mut terminal, &mut app);
    terminal::restore()?;

    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        app.tick()?;
        terminal.draw(|f| app.render(f))?;
        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))?
            && let CEvent::Key(key_event) = event::read()?
        {
            app.handle_key_event(key_event)?;
        }
    }
    Ok(())
}
