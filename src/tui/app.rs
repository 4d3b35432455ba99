//! Application state and update logic for the terminal client.
//!
//! Holds the reducer state plus the wiring toward background tasks.
//! Rendering lives in [`super::ui`]; nothing here touches the
//! terminal, so the whole send pipeline is testable headless.

use std::sync::Arc;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::client::{
    ClientEvent, Connectivity, Conversation, PendingId, RelayApi, probe_until_online,
};

/// Local notice shown when a send is attempted while not online.
pub const NOT_CONNECTED_NOTICE: &str = "Backend is not connected. Please wait for the retry.";

/// Number of animation frames for the pending-reply ellipsis.
pub const ANIMATION_FRAMES: u8 = 3;

/// Terminal client state.
pub struct App {
    /// Set when the user asked to quit.
    pub should_quit: bool,
    /// The render list and its transitions.
    pub conversation: Conversation,
    /// Connectivity toward the relay; gates sends.
    pub connectivity: Connectivity,
    /// Single-line input buffer.
    pub input: String,
    /// Transient local notice, rendered in the status bar only.
    pub notice: Option<String>,
    /// Frame counter for the pending-reply animation.
    pub animation_frame: u8,
    /// Relay access, shared with spawned send tasks.
    api: Arc<dyn RelayApi>,
    /// Channel toward the UI loop for background task results.
    events_tx: mpsc::UnboundedSender<ClientEvent>,
}

impl App {
    /// Create the client in its initial `Connecting` state.
    #[must_use]
    pub fn new(api: Arc<dyn RelayApi>, events_tx: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self {
            should_quit: false,
            conversation: Conversation::new(),
            connectivity: Connectivity::Connecting,
            input: String::new(),
            notice: None,
            animation_frame: 0,
            api,
            events_tx,
        }
    }

    /// Start the connectivity retry loop in the background.
    pub fn spawn_probe(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(probe_until_online(api, tx));
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('n') => self.new_session(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.send_message(),
            KeyCode::Backspace => {
                let _ = self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Run the send pipeline for the current input buffer.
    ///
    /// Empty input is a silent no-op; while not online the only effect
    /// is a local notice. Otherwise the user message and one fresh
    /// placeholder are appended, the input is cleared, and the relay
    /// call runs on its own task so the UI stays responsive. Overlapping
    /// sends coexist; each placeholder settles by its own identifier.
    pub fn send_message(&mut self) {
        let message = self.input.trim().to_string();
        if message.is_empty() {
            return;
        }
        if self.connectivity != Connectivity::Online {
            self.notice = Some(NOT_CONNECTED_NOTICE.to_string());
            return;
        }

        self.notice = None;
        self.conversation.push_user(message.clone(), Utc::now());
        self.input.clear();

        let id = PendingId::new();
        self.conversation.begin_pending(id);

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = api.send(&message).await;
            let _ = tx.send(ClientEvent::Reply { id, outcome });
        });
    }

    /// Apply one background event to the state.
    pub fn apply_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Connectivity(state) => {
                self.connectivity = state;
                if state == Connectivity::Online {
                    let _ = self.conversation.welcome(Utc::now());
                    self.notice = None;
                }
            }
            ClientEvent::Reply { id, outcome } => {
                self.conversation.resolve(id, outcome, Utc::now());
            }
        }
    }

    /// Advance the pending-reply animation.
    pub fn tick(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
    }

    /// Clear the conversation and start over.
    pub fn new_session(&mut self) {
        self.conversation.reset(Utc::now());
        self.notice = None;
    }
}
