//! Wire and state types shared by the relay and the server.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Persona preamble forwarded as the model's system prompt.
    pub system: String,
    /// Conversation context, oldest first.
    pub messages: Vec<Turn>,
}

// =============================================================================
// SESSION STATE
// =============================================================================

/// Relay state as seen by the bubble and input components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Thinking,
    Streaming,
    Error,
}

impl ChatState {
    /// Whether a request is outstanding.
    #[must_use]
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Thinking | Self::Streaming)
    }
}

/// Snapshot published after every state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatSnapshot {
    pub state: ChatState,
    /// Accumulated answer text, or the fallback apology after a failure.
    pub response: String,
    /// Turns currently held as context.
    pub history_len: usize,
}
