//! Per-session conversational state.
//!
//! One `SessionState` per user session, owned by the gateway's session map
//! and passed by mutable reference into each turn-handling function. There
//! is no process-wide singleton and no persistence across sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Which inference provider a session ended up on after the one-shot
/// selection at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveProvider {
    /// Primary provider (Groq)
    Primary,
    /// Secondary provider (Gemini), selected after the primary failed
    Secondary,
    /// No provider available — degraded state, queries are not attempted
    None,
}

impl ActiveProvider {
    /// Human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            ActiveProvider::Primary => "Groq",
            ActiveProvider::Secondary => "Gemini",
            ActiveProvider::None => "none",
        }
    }
}

/// Which main view the session is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// The chat transcript and input
    #[default]
    Chat,
    /// The project README
    Readme,
}

impl View {
    /// The other view.
    pub fn toggled(self) -> Self {
        match self {
            View::Chat => View::Readme,
            View::Readme => View::Chat,
        }
    }
}

/// Conversational state for one user session.
///
/// Messages are appended strictly in (user, assistant) pairs except for a
/// possible trailing unpaired user message awaiting a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Ordered message history, append-only between clears.
    pub messages: Vec<Message>,

    /// Provider this session is served by.
    pub active_provider: ActiveProvider,

    /// Current main view.
    pub view: View,

    /// When this session was created.
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    /// Create a fresh session on the given provider.
    pub fn new(active_provider: ActiveProvider) -> Self {
        Self {
            messages: Vec::new(),
            active_provider,
            view: View::default(),
            created_at: Utc::now(),
        }
    }

    /// Append a message to the history.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Destructive, immediate, unconditional clear of the history.
    /// The view and provider are untouched.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Flip between the chat and readme views. Does not affect history.
    pub fn toggle_view(&mut self) -> View {
        self.view = self.view.toggled();
        self.view
    }

    /// Which provider this session is on.
    pub fn active_provider(&self) -> ActiveProvider {
        self.active_provider
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
