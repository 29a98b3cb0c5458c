//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background reader
//! that forwards them over a channel so the frame loop never blocks on input.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// How long a single poll waits before checking whether the receiver is gone.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal changed size; the next draw re-lays the grid.
    Resize,
}

impl AppEvent {
    /// Map a raw crossterm event.  Key releases and events the deck has no
    /// use for (focus, paste) are dropped.
    pub fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            CtEvent::Key(k) if k.kind != KeyEventKind::Release => Some(Self::Key(k)),
            CtEvent::Mouse(m) => Some(Self::Mouse(m)),
            CtEvent::Resize(..) => Some(Self::Resize),
            _ => None,
        }
    }
}

/// Spawns a blocking reader that polls the terminal and sends events through
/// the returned channel.  The reader exits once the receiver is dropped.
pub fn spawn_event_reader() -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!("terminal poll failed: {e}");
                break;
            }
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        if let Some(app_event) = AppEvent::from_crossterm(ev) {
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
