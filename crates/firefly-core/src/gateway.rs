//! Backend gateway contract.
//!
//! The gateway is the only boundary the stores talk across. It bundles chat
//! completion and session CRUD behind one asynchronous trait so the stores
//! never depend on storage or HTTP details.

use crate::error::Result;
use crate::session::{ChatMessage, SessionId, SessionSummary};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reply to a send operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReply {
    /// Session the exchange was persisted under.
    pub session_id: SessionId,
    /// Assistant reply text.
    pub content: String,
}

/// Result of a rename request that reached the backend.
///
/// An ordinary rejection is `success: false` with an error text, not an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenameOutcome {
    pub success: bool,
    /// Title as committed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenameOutcome {
    pub fn accepted(title: impl Into<String>) -> Self {
        Self {
            success: true,
            title: Some(title.into()),
            error: None,
        }
    }

    pub fn refused(error: impl Into<String>) -> Self {
        Self {
            success: false,
            title: None,
            error: Some(error.into()),
        }
    }
}

/// Asynchronous entry point to the chat backend.
///
/// Every method returning `Err` is a transport-level failure; callers treat it
/// as "nothing happened" and keep their last snapshot.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Sends a user message and waits for the assistant reply.
    ///
    /// When `session_id` is `None` the backend creates a new session and
    /// reports it in the reply.
    async fn send_message(
        &self,
        session_id: Option<SessionId>,
        text: &str,
    ) -> Result<SendReply>;

    /// Lists stored sessions in backend order.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Creates an empty session.
    async fn create_session(&self) -> Result<SessionId>;

    /// Loads the messages of a stored session.
    async fn load_session_messages(&self, session_id: SessionId) -> Result<Vec<ChatMessage>>;

    /// Deletes a stored session.
    async fn delete_session(&self, session_id: SessionId) -> Result<bool>;

    /// Renames a stored session.
    async fn rename_session(
        &self,
        session_id: SessionId,
        new_title: &str,
    ) -> Result<RenameOutcome>;
}
