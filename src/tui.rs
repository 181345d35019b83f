use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{Event as CrosstermEvent, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter the alternate screen. The terminal is put back when the returned
/// guard drops, including while unwinding.
pub fn init() -> io::Result<(Tui, RestoreGuard)> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    let guard = RestoreGuard;
    enable_raw_mode()?;
    Ok((Terminal::new(CrosstermBackend::new(io::stdout()))?, guard))
}

fn restore() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()
}

pub struct RestoreGuard;

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// How often the app ticks (notice expiry) and redraws.
#[derive(Debug, Clone, Copy)]
pub struct Rates {
    pub tick: Duration,
    pub render: Duration,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            render: Duration::from_millis(16), // ~60fps
        }
    }
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick_interval = interval(rates.tick);
            let mut render_interval = interval(rates.render);

            loop {
                let event = tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tick_interval.tick() => Event::Tick,
                    _ = render_interval.tick() => Event::Render,
                    Some(Ok(evt)) = reader.next() => match evt {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                        CrosstermEvent::Resize(..) => Event::Render,
                        _ => continue,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel, task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}
