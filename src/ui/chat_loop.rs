//! Main chat event loop
//!
//! The loop owns the [`App`] exclusively. Network calls run on spawned tasks
//! and report back over a channel, tagged with the widget's request sequence
//! number.

use crate::app::App;
use crate::commands::{process_input, CommandResult};
use crate::core::backend::{DispatchError, QueryBackend};
use crate::core::widget::{Dispatch, SendRejected};
use crate::ui::renderer::ui;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub enum ExchangeEvent {
    Reply {
        seq: u64,
        outcome: Result<serde_json::Value, DispatchError>,
    },
    Simulated {
        seq: u64,
    },
}

/// Run the dispatch side of an accepted send in the background.
pub fn spawn_dispatch(
    dispatch: Dispatch,
    backend: Arc<dyn QueryBackend>,
    tx: mpsc::UnboundedSender<ExchangeEvent>,
    shutdown: CancellationToken,
) {
    match dispatch {
        Dispatch::Settled => {}
        Dispatch::Simulated { seq, delay } => {
            tokio::spawn(async move {
                tokio::select! {
                    _ = shutdown.cancelled() => {}
                    _ = tokio::time::sleep(delay) => {
                        let _ = tx.send(ExchangeEvent::Simulated { seq });
                    }
                }
            });
        }
        Dispatch::Request(request) => {
            tokio::spawn(async move {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!(seq = request.seq, "dropping in-flight request on shutdown");
                    }
                    outcome = backend.post(&request.url, &request.payload) => {
                        let _ = tx.send(ExchangeEvent::Reply { seq: request.seq, outcome });
                    }
                }
            });
        }
    }
}

/// Feed a finished exchange back into the widget.
pub fn apply_event(app: &mut App, event: ExchangeEvent) {
    let applied = match event {
        ExchangeEvent::Reply { seq, outcome } => app.widget.complete(seq, outcome),
        ExchangeEvent::Simulated { seq } => app.widget.complete_simulated(seq),
    };
    if applied {
        app.auto_scroll = true;
        app.flush_transcript_log();
    }
}

struct LoopContext {
    backend: Arc<dyn QueryBackend>,
    tx: mpsc::UnboundedSender<ExchangeEvent>,
    shutdown: CancellationToken,
}

/// Handle one key press. Returns `false` once the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent, ctx: &LoopContext) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return false,
        KeyCode::Char('o') if ctrl => app.widget.toggle_open(),
        KeyCode::Char('l') if ctrl => app.clear_status(),
        _ if !app.widget.is_open() => match key.code {
            KeyCode::Up => app.outline_up(),
            KeyCode::Down => app.outline_down(),
            KeyCode::Enter => app.widget.toggle_open(),
            _ => {}
        },
        KeyCode::Esc => app.widget.toggle_open(),
        KeyCode::Tab | KeyCode::BackTab => {
            let mode = app.widget.cycle_mode();
            app.set_status(format!("Mode set to {}", mode.label()));
        }
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => {
            let (height, width) = app.viewport;
            app.scroll_down(height, width);
        }
        KeyCode::Backspace => app.widget.pop_input(),
        KeyCode::Char(c) => app.widget.push_input(c),
        KeyCode::Enter => submit_input(app, ctx),
        _ => {}
    }
    true
}

fn submit_input(app: &mut App, ctx: &LoopContext) {
    let input = app.widget.input().to_string();
    match process_input(app, &input) {
        CommandResult::Continue => app.widget.set_input(""),
        CommandResult::ProcessAsMessage(text) => match app.widget.begin_send(&text) {
            Ok(dispatch) => {
                app.auto_scroll = true;
                app.flush_transcript_log();
                spawn_dispatch(
                    dispatch,
                    Arc::clone(&ctx.backend),
                    ctx.tx.clone(),
                    ctx.shutdown.clone(),
                );
            }
            Err(SendRejected::Busy) => app.set_status(format!("{}", SendRejected::Busy)),
            Err(SendRejected::Empty) => {}
        },
    }
}

pub async fn run_chat(mut app: App, backend: Arc<dyn QueryBackend>) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<ExchangeEvent>();
    let ctx = LoopContext {
        backend,
        tx,
        shutdown: CancellationToken::new(),
    };

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        while let Ok(exchange) = rx.try_recv() {
            apply_event(&mut app, exchange);
        }

        if let Err(e) = terminal.draw(|f| ui(f, &mut app)) {
            break 'main_loop Err(e.into());
        }

        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if !handle_key(&mut app, key, &ctx) {
                        break 'main_loop Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => break 'main_loop Err(e.into()),
            },
            Ok(false) => tokio::task::yield_now().await,
            Err(e) => break 'main_loop Err(e.into()),
        }
    };

    ctx.shutdown.cancel();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
