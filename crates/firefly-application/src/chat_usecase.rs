//! Chat use case implementation.
//!
//! This module provides the `ChatUseCase`, which coordinates the
//! `ConversationStore` and the `SessionRegistry` so that neither store has to
//! know about the other.

use firefly_core::connection::GatewayConnection;
use firefly_core::error::Result;
use firefly_core::gateway::RenameOutcome;
use firefly_core::session::SessionId;
use firefly_core::store::{ConversationStore, Outcome, RefreshPolicy, SessionRegistry};
use std::sync::Arc;

/// Use case for chatting across multiple stored sessions.
///
/// # Responsibilities
///
/// - Refreshing the session list at startup and after a send that opened a session
/// - Clearing or replacing the conversation when sessions are created, opened or deleted
/// - Driving the rename dialog and surfacing backend refusals in it
pub struct ChatUseCase {
    connection: Arc<GatewayConnection>,
    conversation: ConversationStore,
    registry: SessionRegistry,
}

impl ChatUseCase {
    pub fn new(connection: Arc<GatewayConnection>, policy: RefreshPolicy) -> Self {
        Self {
            conversation: ConversationStore::new(connection.clone()),
            registry: SessionRegistry::with_policy(connection.clone(), policy),
            connection,
        }
    }

    pub fn connection(&self) -> &GatewayConnection {
        &self.connection
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Loads the initial session list.
    pub async fn startup(&self) -> Outcome<usize> {
        tracing::info!("[ChatUseCase] Starting up");
        self.registry.refresh().await
    }

    /// Sends `text` in the active conversation.
    ///
    /// A send from a conversation with no session makes the backend create one,
    /// so the session list is refreshed after it succeeds.
    pub async fn send(&self, text: &str) -> Outcome<String> {
        let unbound = self.conversation.session_id().await.is_none();
        let outcome = self.conversation.send_message(text).await;
        self.after_send(unbound, &outcome).await;
        outcome
    }

    /// Sends the conversation's input buffer.
    pub async fn submit_input(&self) -> Outcome<String> {
        let unbound = self.conversation.session_id().await.is_none();
        let outcome = self.conversation.submit_input().await;
        self.after_send(unbound, &outcome).await;
        outcome
    }

    async fn after_send(&self, unbound: bool, outcome: &Outcome<String>) {
        if unbound && outcome.is_done() {
            tracing::debug!("[ChatUseCase] Send opened a session, refreshing sessions");
            self.registry.refresh().await;
        }
    }

    /// Creates a new session and makes it the active, empty conversation.
    pub async fn new_chat(&self) -> Outcome<SessionId> {
        let outcome = self.registry.create_session().await;
        if let Outcome::Done(session_id) = outcome {
            self.conversation
                .replace_messages(Some(session_id), Vec::new())
                .await;
        }
        outcome
    }

    /// Opens a stored session in the conversation.
    ///
    /// On failure the conversation is left as it was.
    pub async fn open_session(&self, session_id: SessionId) -> Outcome<usize> {
        match self.registry.load_session(session_id).await {
            Outcome::Done(messages) => {
                let count = messages.len();
                self.conversation
                    .replace_messages(Some(session_id), messages)
                    .await;
                Outcome::Done(count)
            }
            other => other.map(|messages| messages.len()),
        }
    }

    /// Deletes a session, clearing the conversation if it was showing it.
    pub async fn delete_session(&self, session_id: SessionId) -> Outcome<bool> {
        let outcome = self.registry.delete_session(session_id).await;
        if outcome.is_done() && self.conversation.session_id().await == Some(session_id) {
            tracing::debug!("[ChatUseCase] Active session {} deleted", session_id);
            self.conversation.clear().await;
        }
        outcome
    }

    pub async fn clear_conversation(&self) {
        self.conversation.clear().await;
    }

    /// Opens the rename dialog for a listed session.
    pub async fn begin_rename(&self, session_id: SessionId) -> bool {
        self.registry.open_rename_dialog(session_id).await
    }

    pub async fn set_rename_title(&self, title: impl Into<String>) {
        self.registry.set_rename_title(title).await;
    }

    pub async fn cancel_rename(&self) {
        self.registry.close_rename_dialog().await;
    }

    /// Saves the title staged in the rename dialog.
    ///
    /// On success the dialog closes and the list is refreshed. A refusal keeps
    /// the dialog open with the backend's error text.
    ///
    /// # Errors
    ///
    /// Transport failures of the rename call are returned as-is.
    pub async fn submit_rename(&self) -> Result<Outcome<RenameOutcome>> {
        let dialog = self.registry.rename_dialog().await;
        let Some((session_id, title)) = dialog.save_request() else {
            return Ok(Outcome::Rejected);
        };

        let outcome = self.registry.rename_session(session_id, &title).await?;
        if let Outcome::Done(result) = &outcome {
            if result.success {
                self.registry.close_rename_dialog().await;
                if !self.registry.policy().rename {
                    self.registry.refresh().await;
                }
            } else {
                let error = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "Rename failed".to_string());
                self.registry.set_rename_error(Some(error)).await;
            }
        }
        Ok(outcome)
    }
}
