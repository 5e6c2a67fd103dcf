//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs describe the on-disk layout of `chats.toml`. They are private to
//! the infrastructure layer; the domain only sees `SessionSummary` and
//! `ChatMessage`.
//!
//! ### Archive Version History
//! - **1.0.0**: Initial schema (`next_session_id`, sessions with messages)

use chrono::{DateTime, Utc};
use firefly_core::session::{ChatMessage, MessageRole, SessionSummary};
use serde::{Deserialize, Serialize};

/// Current schema version of the chat archive.
pub const CHAT_ARCHIVE_VERSION: &str = "1.0.0";

/// The whole session archive as written to `chats.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatArchive {
    pub schema_version: String,
    /// Next id handed out by `create_session`; ids are never reused.
    pub next_session_id: i64,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl Default for ChatArchive {
    fn default() -> Self {
        Self {
            schema_version: CHAT_ARCHIVE_VERSION.to_string(),
            next_session_id: 1,
            sessions: Vec::new(),
        }
    }
}

impl ChatArchive {
    pub fn find(&self, id: i64) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut SessionRecord> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}

/// One stored session with its full message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Set on creation and bumped by renames; saving messages leaves it alone.
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

impl SessionRecord {
    pub fn new(id: i64, title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    pub fn to_summary(&self) -> SessionSummary {
        SessionSummary::new(self.id, self.title.clone(), self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn into_domain(self) -> ChatMessage {
        ChatMessage::new(self.role, self.content)
    }
}
