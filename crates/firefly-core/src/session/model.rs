//! Session summary model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title given to a session when it is created.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Backend-assigned session identifier.
///
/// Identifiers are never minted client-side; the core only passes them back
/// to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl SessionId {
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SessionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Summary metadata of a stored session, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique session identifier.
    pub id: SessionId,
    /// Display title.
    pub title: String,
    /// When the session was created (backend clock).
    pub created_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn new(
        id: impl Into<SessionId>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            created_at,
        }
    }
}
