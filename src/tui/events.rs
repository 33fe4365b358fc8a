use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{Tenant, UserRecord};
use crate::pagination::{FetchFailure, PageBatch, PageRequest};

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Page navigation event
    PageChange(String),

    /// A users fetch finished, successfully or not
    PageLoaded {
        request: PageRequest,
        outcome: Result<PageBatch<UserRecord>, FetchFailure>,
    },

    /// The tenant list finished loading
    TenantsLoaded(Result<Vec<Tenant>, String>),

    /// The user picked a different tenant
    TenantSelected(String),

    /// The user opened a row of the users table
    UserSelected(Box<UserRecord>),

    /// Status message event
    StatusMessage(String),

    /// Clear status message event
    ClearStatus,
}

/// Event handler for managing input events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,

    input_started: bool,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            receiver,
            sender,
            tick_interval: Duration::from_millis(250),
            input_started: false,
        }
    }

    /// Start forwarding terminal input on a dedicated thread.
    ///
    /// The thread polls with the tick interval as timeout, so a quiet
    /// terminal still produces [`Event::Tick`]. It exits once the receiving
    /// side is dropped.
    pub fn start_input(&mut self) {
        if self.input_started {
            return;
        }
        self.input_started = true;

        let sender = self.sender.clone();
        let tick_interval = self.tick_interval;
        thread::spawn(move || loop {
            let event = match crossterm::event::poll(tick_interval) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => Self::convert_crossterm_event(event),
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        None
                    }
                },
                Ok(false) => Some(Event::Tick),
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    Some(Event::Tick)
                }
            };

            if let Some(event) = event {
                if sender.send(event).is_err() {
                    debug!("Event receiver dropped, stopping input thread");
                    break;
                }
            }
        });
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
            CrosstermEvent::Key(_) => None,
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => {
                None
            }
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
