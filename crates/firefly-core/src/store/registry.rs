//! Session list state and lifecycle operations.

use super::outcome::Outcome;
use super::policy::{RefreshPolicy, RegistryOperation};
use super::slot::{OperationKind, OperationSlot};
use crate::connection::GatewayConnection;
use crate::error::Result;
use crate::gateway::{BackendGateway, RenameOutcome};
use crate::session::{ChatMessage, RenameDialogState, SessionId, SessionSummary};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Maintains the session summary list and brokers lifecycle operations.
///
/// `SessionRegistry` is responsible for:
/// - Refreshing the list from the backend (never updating it optimistically)
/// - Creating, loading, deleting and renaming sessions
/// - Holding the rename dialog staging state
///
/// Whether an operation refreshes the list afterwards is decided by its
/// [`RefreshPolicy`]. Create, delete and rename share a single slot; refresh
/// and load are reads and run freely.
pub struct SessionRegistry {
    connection: Arc<GatewayConnection>,
    sessions: RwLock<Vec<SessionSummary>>,
    rename_dialog: RwLock<RenameDialogState>,
    slot: OperationSlot,
    policy: RefreshPolicy,
}

impl SessionRegistry {
    /// Creates a registry with the default refresh policy.
    pub fn new(connection: Arc<GatewayConnection>) -> Self {
        Self::with_policy(connection, RefreshPolicy::default())
    }

    pub fn with_policy(connection: Arc<GatewayConnection>, policy: RefreshPolicy) -> Self {
        Self {
            connection,
            sessions: RwLock::new(Vec::new()),
            rename_dialog: RwLock::new(RenameDialogState::default()),
            slot: OperationSlot::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// True while a create, delete or rename is in flight.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Returns a snapshot of the cached session list.
    pub async fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.read().await.clone()
    }

    /// Looks up a session in the cached list.
    pub async fn find(&self, session_id: SessionId) -> Option<SessionSummary> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    /// Replaces the cached list with the backend's current list.
    ///
    /// The backend order is kept as-is. When two refreshes overlap, the one
    /// that completes last wins.
    pub async fn refresh(&self) -> Outcome<usize> {
        let Some(gateway) = self.connection.gateway() else {
            return Outcome::NotConnected;
        };
        self.refresh_with(gateway.as_ref()).await
    }

    async fn refresh_with(&self, gateway: &dyn BackendGateway) -> Outcome<usize> {
        match gateway.list_sessions().await {
            Ok(sessions) => {
                let count = sessions.len();
                *self.sessions.write().await = sessions;
                tracing::debug!("[SessionRegistry] Refreshed session list: {} sessions", count);
                Outcome::Done(count)
            }
            Err(e) => {
                tracing::warn!("[SessionRegistry] Failed to list sessions: {}", e);
                Outcome::Failed
            }
        }
    }

    async fn refresh_after(&self, operation: RegistryOperation, gateway: &dyn BackendGateway) {
        if self.policy.refresh_after(operation) {
            self.refresh_with(gateway).await;
        }
    }

    /// Asks the backend for a new empty session.
    ///
    /// Does not touch the active conversation; clearing it is up to the caller.
    pub async fn create_session(&self) -> Outcome<SessionId> {
        let Some(gateway) = self.connection.gateway() else {
            return Outcome::NotConnected;
        };
        let Some(_guard) = self.slot.try_acquire(OperationKind::Create) else {
            return Outcome::Busy;
        };

        match gateway.create_session().await {
            Ok(session_id) => {
                tracing::info!("[SessionRegistry] Created session {}", session_id);
                self.refresh_after(RegistryOperation::Create, gateway.as_ref())
                    .await;
                Outcome::Done(session_id)
            }
            Err(e) => {
                tracing::warn!("[SessionRegistry] Failed to create session: {}", e);
                Outcome::Failed
            }
        }
    }

    /// Fetches the stored messages of a session and hands them to the caller.
    pub async fn load_session(&self, session_id: SessionId) -> Outcome<Vec<ChatMessage>> {
        let Some(gateway) = self.connection.gateway() else {
            return Outcome::NotConnected;
        };

        match gateway.load_session_messages(session_id).await {
            Ok(messages) => {
                tracing::info!(
                    "[SessionRegistry] Loaded session {} ({} messages)",
                    session_id,
                    messages.len()
                );
                self.refresh_after(RegistryOperation::Load, gateway.as_ref())
                    .await;
                Outcome::Done(messages)
            }
            Err(e) => {
                tracing::warn!("[SessionRegistry] Failed to load session {}: {}", session_id, e);
                Outcome::Failed
            }
        }
    }

    /// Deletes a session on the backend.
    ///
    /// No local existence check is made: an id missing from the cached list is
    /// still sent to the backend.
    pub async fn delete_session(&self, session_id: SessionId) -> Outcome<bool> {
        let Some(gateway) = self.connection.gateway() else {
            return Outcome::NotConnected;
        };
        let Some(_guard) = self.slot.try_acquire(OperationKind::Delete) else {
            return Outcome::Busy;
        };

        match gateway.delete_session(session_id).await {
            Ok(deleted) => {
                tracing::info!("[SessionRegistry] Deleted session {}", session_id);
                self.refresh_after(RegistryOperation::Delete, gateway.as_ref())
                    .await;
                Outcome::Done(deleted)
            }
            Err(e) => {
                tracing::warn!(
                    "[SessionRegistry] Failed to delete session {}: {}",
                    session_id,
                    e
                );
                Outcome::Failed
            }
        }
    }

    /// Renames a session on the backend.
    ///
    /// A blank title is rejected without calling the backend. A backend
    /// refusal comes back as `Done` with `success: false`.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the gateway call itself fails.
    pub async fn rename_session(
        &self,
        session_id: SessionId,
        new_title: &str,
    ) -> Result<Outcome<RenameOutcome>> {
        let title = new_title.trim();
        if title.is_empty() {
            return Ok(Outcome::Rejected);
        }
        let Some(gateway) = self.connection.gateway() else {
            return Ok(Outcome::NotConnected);
        };
        let Some(_guard) = self.slot.try_acquire(OperationKind::Rename) else {
            return Ok(Outcome::Busy);
        };

        let outcome = gateway.rename_session(session_id, title).await?;
        if outcome.success {
            tracing::info!("[SessionRegistry] Renamed session {} to: {}", session_id, title);
            self.refresh_after(RegistryOperation::Rename, gateway.as_ref())
                .await;
        } else {
            tracing::info!(
                "[SessionRegistry] Rename of session {} refused: {:?}",
                session_id,
                outcome.error
            );
        }
        Ok(Outcome::Done(outcome))
    }

    // ============================================================================
    // Rename dialog staging state
    // ============================================================================

    pub async fn rename_dialog(&self) -> RenameDialogState {
        self.rename_dialog.read().await.clone()
    }

    /// Opens the rename dialog for a session in the cached list.
    ///
    /// Returns false if the session is not in the list.
    pub async fn open_rename_dialog(&self, session_id: SessionId) -> bool {
        let Some(session) = self.find(session_id).await else {
            return false;
        };
        *self.rename_dialog.write().await = RenameDialogState::open_for(&session);
        true
    }

    pub async fn set_rename_title(&self, title: impl Into<String>) {
        self.rename_dialog.write().await.edit_title = title.into();
    }

    pub async fn set_rename_error(&self, error: Option<String>) {
        self.rename_dialog.write().await.error = error;
    }

    pub async fn close_rename_dialog(&self) {
        *self.rename_dialog.write().await = RenameDialogState::default();
    }
}
