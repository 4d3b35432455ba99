//! Terminal plumbing and the main event loop for the `manray` binary.

pub mod app;
pub mod ui;

pub use app::App;

use std::io::{self, Stderr};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::client::{ClientEvent, HttpRelayApi, RelayApi};

/// Terminal handle used by the client.
pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Terminal-side events fed into the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Animation/redraw tick.
    Tick,
}

/// Reads terminal events and ticks onto one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    _tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Spawn the reader and tick tasks.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _tx = tx.clone();

        // Spawn event reader task
        let tx_events = tx.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            loop {
                if let Some(Ok(evt)) = reader.next().await {
                    let app_event = match evt {
                        Event::Key(key) => {
                            // Only handle key press events, not release
                            if key.kind == KeyEventKind::Press {
                                Some(AppEvent::Key(key))
                            } else {
                                None
                            }
                        }
                        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
                        _ => None,
                    };

                    if let Some(event) = app_event {
                        if tx_events.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        // Spawn tick timer for animations (300ms interval)
        let tx_tick = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(300));
            loop {
                interval.tick().await;
                if tx_tick.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx }
    }

    /// Next terminal-side event, if the channel is still open.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Put the terminal into raw alternate-screen mode.
///
/// # Errors
/// Returns an error if the terminal cannot be configured.
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its normal state.
///
/// # Errors
/// Returns an error if the terminal cannot be restored.
pub fn restore() -> Result<()> {
    execute!(io::stderr(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

/// Run the terminal client until the user quits.
///
/// # Errors
/// Returns an error if the terminal or the HTTP client cannot be set
/// up, or if drawing fails.
pub async fn run() -> Result<()> {
    install_panic_hook();

    let api: Arc<dyn RelayApi> = Arc::new(HttpRelayApi::from_env()?);
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<ClientEvent>();
    let mut app = App::new(api, client_tx);
    app.spawn_probe();

    let mut terminal = init()?;
    let mut events = EventHandler::new();

    let result = main_loop(&mut terminal, &mut app, &mut events, &mut client_rx).await;

    restore()?;
    result
}

/// Draw, then wait for the next terminal or client event.
async fn main_loop(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    client_rx: &mut mpsc::UnboundedReceiver<ClientEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        tokio::select! {
            terminal_event = events.next() => match terminal_event {
                Some(AppEvent::Key(key)) => app.handle_key(key),
                Some(AppEvent::Tick) => app.tick(),
                Some(AppEvent::Resize(_, _)) => {}
                None => break,
            },
            client_event = client_rx.recv() => match client_event {
                Some(event) => app.apply_event(event),
                None => break,
            },
        }
    }
    Ok(())
}
