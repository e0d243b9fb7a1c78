use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::catalog::{FetchError, Page};
use crate::pagination::FetchTicket;

/// Application events
#[derive(Debug)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// A page fetch resolved
    PageLoaded {
        ticket: FetchTicket,
        result: Result<Page, FetchError>,
    },
}

/// Event handler for managing input events.
///
/// Terminal input is read on a dedicated thread and funneled into the same
/// channel as internal events, so the UI loop has a single source to await.
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a handler that also reads terminal input
    pub fn new(tick_interval: Duration) -> Self {
        let handler = Self::internal_only();
        let sender = handler.sender.clone();

        std::thread::spawn(move || loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => match Self::convert_crossterm_event(event) {
                        Some(event) => event,
                        None => continue,
                    },
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    warn!("Terminal event polling failed: {}", e);
                    break;
                }
            };

            if sender.send(event).is_err() {
                debug!("Event channel closed, stopping input thread");
                break;
            }
        });

        handler
    }

    /// Create a handler that only carries internal events
    pub fn internal_only() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { receiver, sender }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                Some(Event::Key(key_event))
            }
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}
