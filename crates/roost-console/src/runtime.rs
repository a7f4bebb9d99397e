use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc::UnboundedReceiver;

use roost_core::SessionEvent;

use crate::input::handle_key;
use crate::render::render;
use crate::ui::terminal::Tui;
use crate::ui::App;

pub(crate) async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    mut session_rx: UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    let mut event_stream = EventStream::new();

    // Regular redraws so relative timestamps and toast expiry stay current.
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    let mut directory_rx = app
        .take_directory_rx()
        .ok_or_else(|| anyhow::anyhow!("directory channel already taken"))?;

    while app.running {
        terminal.draw(|f| render(f, app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    if key.kind == KeyEventKind::Press {
                        if key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL)
                        {
                            app.quit();
                        } else {
                            handle_key(app, key);
                        }
                    }
                }
            }

            // Poll results and write confirmations for the open chat.
            Some(event) = session_rx.recv() => {
                app.handle_session_event(event);
            }

            // Ticket list fetches finishing in the background.
            Some(event) = directory_rx.recv() => {
                app.apply_directory_event(event);
            }

            _ = tick_interval.tick() => {}
        }
    }
    Ok(())
}
