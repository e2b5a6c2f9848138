//! Conversation request/reply types
//!
//! The conversation engine is a black box that returns structured JSON:
//! a chat message for the user plus, optionally, a complete replacement
//! trip or a partial trip update. Wire shape is camelCase.

use serde::{Deserialize, Serialize};

use crate::domain::{Trip, TripPatch};

/// Message role in the conversation transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Everything needed for one conversation turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message for this turn
    pub text: String,

    /// Current trip, serialized into the engine's context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<Trip>,

    /// Prior transcript, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            trip: None,
            history: Vec::new(),
        }
    }

    /// Attach the current trip as context
    pub fn with_trip(mut self, trip: Trip) -> Self {
        self.trip = Some(trip);
        self
    }

    /// Attach the prior transcript
    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }
}

/// Structured reply from one conversation turn.
///
/// `trip` triggers a whole-trip replace; `trip_update` a partial merge.
/// Both are plain data shaped like the itinerary model; item ids are
/// minted by the core on receipt, never trusted from the remote response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Conversational text shown in the chat pane
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<Trip>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_update: Option<TripPatch>,

    /// A follow-up the UI can offer as a one-tap prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
