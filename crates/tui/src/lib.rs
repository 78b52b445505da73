mod app;
mod async_ops;
mod theme;
mod ui;
mod views;

use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use async_ops::AsyncCommand;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use journey_api_client::ClientFactory;
use journey_client::{Controller, Session};
use journey_runtime_config::UiSettings;
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Set to a filter directive (`info`, `journey_client=debug`, ...) to log to a file.
pub const LOG_ENV: &str = "JOURNEY_LOG";

/// Launch the TUI on an opened session. The stored key, if any, is resumed
/// before the first key press.
pub fn run<F: ClientFactory>(session: Session<F>, ui: &UiSettings) -> Result<()> {
    let mut app = App::new(Controller::new(session), ui);
    app.pending_command = Some(AsyncCommand::Load);

    let rt = tokio::runtime::Runtime::new().context("start async runtime")?;
    info!("tui started");

    enable_raw_mode()?;
    let result = with_restore(
        || {
            stdout().execute(EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
            event_loop(&mut terminal, &mut app, &rt)
        },
        restore_terminal,
    );
    info!("tui stopped");
    result
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run `body`, then `restore` whether or not `body` failed. A failure in
/// `body` is reported ahead of one in `restore`.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn event_loop<F: ClientFactory>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App<F>,
    rt: &tokio::runtime::Runtime,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Draw once with the command pending so "Working..." shows, then run it.
        if app.busy() {
            app.run_pending(rt);
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key.code) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Send `tracing` output to `path` when [`LOG_ENV`] is set. Writing to the
/// terminal would corrupt the alternate screen, so nothing is logged otherwise.
/// Returns whether logging was enabled.
pub fn init_file_logging(path: &Path) -> Result<bool> {
    let Some(directive) = std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
    else {
        return Ok(false);
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create log dir {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_new(directive.trim()).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("init logging: {e}"))?;
    Ok(true)
}
