//! Chat repository trait.
//!
//! Defines the interface for persisting sessions and their messages.

use super::message::{ChatMessage, MessageRole};
use super::model::{SessionId, SessionSummary};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for session and message persistence.
///
/// This trait decouples the local backend from the specific storage
/// mechanism (TOML archive, database, remote API).
///
/// # Implementation Notes
///
/// Implementations should:
/// - Assign session ids themselves and never reuse them
/// - Title new sessions with [`DEFAULT_SESSION_TITLE`](super::DEFAULT_SESSION_TITLE)
/// - Leave titles alone when messages are saved; only `update_title` changes them
/// - Remove a session's messages together with the session
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Creates an empty session and returns its id.
    async fn create_session(&self, title: &str) -> Result<SessionId>;

    /// Lists all sessions, most recently created or renamed first.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Returns the messages of a session in insertion order.
    ///
    /// # Returns
    ///
    /// - `Ok(messages)`: Messages of the session (empty for an unknown id)
    /// - `Err(_)`: Error occurred during retrieval
    async fn session_messages(&self, session_id: SessionId) -> Result<Vec<ChatMessage>>;

    /// Appends a message to a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    async fn save_message(&self, session_id: SessionId, role: MessageRole, content: &str)
    -> Result<()>;

    /// Replaces a session's title.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    async fn update_title(&self, session_id: SessionId, title: &str) -> Result<()>;

    /// Deletes a session and its messages.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Session deleted successfully (or didn't exist)
    /// - `Err(_)`: Error occurred during deletion
    async fn delete_session(&self, session_id: SessionId) -> Result<()>;
}
