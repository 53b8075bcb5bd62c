//! Message types for AI conversations
//!
//! A conversation is an ordered list of role-tagged text messages. Vendor
//! adapters translate it into their own wire shape.

use serde::{Deserialize, Serialize};

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire name of the role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a new user message
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create a new assistant message
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }

    /// Create a new system message
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

/// Split a conversation into its system prompt (first system message, if any)
/// and the remaining dialogue in original order.
#[must_use]
pub fn split_system(messages: &[Message]) -> (Option<&str>, Vec<&Message>) {
    let system = messages
        .iter()
        .find(|msg| msg.is_system())
        .map(|msg| msg.content.as_str());
    let dialogue = messages.iter().filter(|msg| !msg.is_system()).collect();
    (system, dialogue)
}
