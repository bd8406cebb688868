//! Two-thread TUI orchestration.
//!
//! Terminal I/O runs on a dedicated OS thread; the coordinator, its timers and
//! the suggestion fetches stay on the tokio runtime. Communication via
//! `tokio::sync::mpsc` channels.

mod input;

use std::io;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use sonar_core::CoordinatorEvent;
use sonar_core::suggest::SuggestionTransport;

use crate::app::App;
use crate::ui;

pub use input::handle_term_event;

/// Terminal events forwarded from the UI reader thread.
pub enum TermEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize(u16, u16),
}

/// Run the interactive address bar until the user quits.
///
/// `events` is the receiver paired with the app's coordinator; `committed`
/// receives the text its navigator is handed.
pub async fn run<T: SuggestionTransport>(
    mut app: App<T>,
    mut events: mpsc::UnboundedReceiver<CoordinatorEvent>,
    mut committed: mpsc::UnboundedReceiver<String>,
) -> anyhow::Result<()> {
    // 1. Enter raw mode, create terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 2. Channels + cancellation token
    let cancel = CancellationToken::new();
    let (term_tx, mut term_rx) = mpsc::channel::<TermEvent>(64);

    // 3. Spawn dedicated OS thread for crossterm::event::read()
    let cancel_clone = cancel.clone();
    let ui_thread = std::thread::spawn(move || {
        loop {
            if cancel_clone.is_cancelled() {
                break;
            }
            // Poll with 50ms timeout so we can check cancellation
            if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(Event::Key(key)) => {
                        // Filter out Release events (Windows emits Press + Release per keystroke)
                        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                            continue;
                        }
                        TermEvent::Key(key)
                    }
                    Ok(Event::Mouse(mouse)) => TermEvent::Mouse(mouse),
                    Ok(Event::Resize(w, h)) => TermEvent::Resize(w, h),
                    _ => continue,
                };
                if term_tx.blocking_send(forwarded).is_err() {
                    break;
                }
            }
        }
    });

    info!("Address bar ready");
    let mut tick = tokio::time::interval(Duration::from_millis(50));

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
                    break Err(e.into());
                }
            }
            Some(term_event) = term_rx.recv() => {
                input::handle_term_event(&mut app, term_event);
            }
            Some(event) = events.recv() => {
                app.coordinator.handle_event(event);
            }
            Some(text) = committed.recv() => {
                app.open(&text);
            }
        }
        if app.should_quit {
            break Ok(());
        }
    };

    // 4. Shutdown: signal UI thread to stop
    cancel.cancel();
    let _ = ui_thread.join(); // fast, <50ms due to poll timeout

    // 5. Restore terminal
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    result
}
