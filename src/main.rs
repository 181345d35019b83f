mod action;
mod app;
mod auth;
mod boundary;
mod config;
mod detail;
mod error;
mod event;
mod forge;
mod github;
mod listing;
mod modal;
mod route;
mod tui;
mod types;
mod ui;

use std::fs::OpenOptions;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::error::FolioError;
use crate::event::Event;
use crate::forge::Forge;
use crate::github::GitHub;
use crate::route::Route;
use crate::tui::{EventHandler, Rates};

#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to a config file (default: <config dir>/folio/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub account whose repositories are shown
    #[arg(long)]
    account: Option<String>,

    /// Repositories per page (1-100)
    #[arg(long)]
    per_page: Option<u32>,

    /// Start at a path such as `/repos/<name>`
    #[arg(long, default_value = "/")]
    open: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    // Panics inside the event loop are recovered; just record them.
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    let config = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(FolioError::Config(format!("{} does not exist", path.display())).into())
        }
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .with_overrides(cli.account, cli.per_page);

    let token = auth::load_token(&config);
    let github = GitHub::new(config.client_config(token))?;
    tracing::info!(account = %config.account, per_page = config.per_page, "starting");

    run(Arc::new(github), Route::parse(&cli.open)).await
}

fn init_logging(log_file: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi),
        )
        .init();
    Ok(())
}

async fn run(forge: Arc<dyn Forge>, start: Route) -> Result<(), Box<dyn std::error::Error>> {
    let (mut terminal, _restore) = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(forge, action_tx.clone());
    action_tx.send(Action::Navigate(start))?;

    let mut events = EventHandler::new(Rates::default());

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        let mut drawn = Ok(());
                        let outcome = boundary::guard(|| {
                            drawn = terminal.draw(|frame| ui::render(frame, &app)).map(|_| ());
                        });
                        if let Err(msg) = outcome {
                            app.enter_fault(msg);
                        }
                        drawn?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                if let Err(msg) = boundary::guard(|| app.update(action)) {
                    app.enter_fault(msg);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
