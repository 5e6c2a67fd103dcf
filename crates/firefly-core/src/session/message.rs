//! Conversation message types.
//!
//! This module contains types for representing messages in the active
//! conversation, including roles and the delivery status of optimistic sends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

impl MessageRole {
    /// Convert role to the string used by storage and the completion API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of a message in the active conversation.
///
/// A user message starts as `Pending` when it is appended optimistically and
/// ends as `Committed` or `Failed` once the send resolves. It is never removed
/// on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Appended locally, backend call still in flight.
    Pending,
    /// Confirmed by the backend (or loaded from it).
    #[default]
    Committed,
    /// The backend call failed; the message stays visible.
    Failed,
}

/// A single message in the active conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message (opaque markup).
    pub content: String,
    /// Delivery state; messages coming from the backend are committed.
    #[serde(default)]
    pub status: DeliveryStatus,
}

impl ChatMessage {
    /// Creates a committed message.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            status: DeliveryStatus::Committed,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Creates a user message that has not been confirmed by the backend yet.
    pub fn pending_user(content: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Pending,
            ..Self::user(content)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == DeliveryStatus::Failed
    }
}
