//! Active conversation state.

use super::outcome::Outcome;
use super::slot::{OperationKind, OperationSlot};
use crate::connection::GatewayConnection;
use crate::gateway::SendReply;
use crate::session::{ChatMessage, DeliveryStatus, SessionId};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<ChatMessage>,
    session_id: Option<SessionId>,
    input: String,
    /// Bumped whenever the sequence is replaced or cleared, so a send that
    /// resolves afterwards cannot write into a different conversation.
    generation: u64,
}

/// Owns the message sequence of the active conversation.
///
/// `ConversationStore` is responsible for:
/// - Appending the user's message optimistically before the backend call
/// - Appending the assistant reply once the call resolves
/// - Tracking which session the shown messages belong to
/// - Allowing at most one send in flight
///
/// It never talks to the session list; coordination with
/// [`SessionRegistry`](super::SessionRegistry) is done by the caller.
pub struct ConversationStore {
    connection: Arc<GatewayConnection>,
    state: RwLock<ConversationState>,
    send_slot: OperationSlot,
}

impl ConversationStore {
    pub fn new(connection: Arc<GatewayConnection>) -> Self {
        Self {
            connection,
            state: RwLock::new(ConversationState::default()),
            send_slot: OperationSlot::new(),
        }
    }

    /// Returns a snapshot of the active message sequence.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.read().await.messages.clone()
    }

    /// Returns the session the active conversation belongs to.
    pub async fn session_id(&self) -> Option<SessionId> {
        self.state.read().await.session_id
    }

    /// True while a send is in flight.
    pub fn is_loading(&self) -> bool {
        self.send_slot.is_busy()
    }

    pub async fn input(&self) -> String {
        self.state.read().await.input.clone()
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.write().await.input = text.into();
    }

    /// Sends the pending input buffer.
    pub async fn submit_input(&self) -> Outcome<String> {
        let text = self.input().await;
        self.send_message(&text).await
    }

    /// Sends a user message and appends the assistant reply.
    ///
    /// The trimmed text is appended as a `Pending` user message before the
    /// gateway is called. On success it becomes `Committed` and the reply is
    /// appended; on failure it becomes `Failed` and stays in the sequence.
    ///
    /// # Returns
    ///
    /// - `Done(reply)`: the backend answered
    /// - `Rejected`: the text was empty after trimming
    /// - `Busy`: another send is still in flight
    /// - `NotConnected`: no gateway attached; the message is marked failed
    /// - `Failed`: the gateway call failed; the message is marked failed
    pub async fn send_message(&self, text: &str) -> Outcome<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("[ConversationStore] Ignoring empty message");
            return Outcome::Rejected;
        }

        let Some(_guard) = self.send_slot.try_acquire(OperationKind::Send) else {
            tracing::debug!("[ConversationStore] Send ignored, another send is in flight");
            return Outcome::Busy;
        };

        let (index, generation, session_id) = {
            let mut state = self.state.write().await;
            state.messages.push(ChatMessage::pending_user(trimmed));
            state.input.clear();
            (state.messages.len() - 1, state.generation, state.session_id)
        };

        let Some(gateway) = self.connection.gateway() else {
            tracing::debug!("[ConversationStore] Gateway not connected, message not sent");
            self.settle(generation, index, DeliveryStatus::Failed, None)
                .await;
            return Outcome::NotConnected;
        };

        tracing::debug!(
            "[ConversationStore] Sending message to session {:?}",
            session_id
        );

        match gateway.send_message(session_id, trimmed).await {
            Ok(reply) => {
                let content = reply.content.clone();
                self.settle(generation, index, DeliveryStatus::Committed, Some(reply))
                    .await;
                Outcome::Done(content)
            }
            Err(e) => {
                tracing::warn!("[ConversationStore] Error sending message: {}", e);
                self.settle(generation, index, DeliveryStatus::Failed, None)
                    .await;
                Outcome::Failed
            }
        }
    }

    /// Applies the result of a send to the user message at `index`.
    ///
    /// Returns false when the conversation was replaced in the meantime.
    async fn settle(
        &self,
        generation: u64,
        index: usize,
        status: DeliveryStatus,
        reply: Option<SendReply>,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::info!(
                "[ConversationStore] Conversation changed while sending; result not shown"
            );
            return false;
        }

        if let Some(message) = state.messages.get_mut(index) {
            message.status = status;
        }

        if let Some(reply) = reply {
            match state.session_id {
                None => state.session_id = Some(reply.session_id),
                Some(current) if current != reply.session_id => {
                    tracing::warn!(
                        "[ConversationStore] Reply persisted under session {} while showing {}",
                        reply.session_id,
                        current
                    );
                }
                Some(_) => {}
            }
            state.messages.push(ChatMessage::assistant(reply.content));
        }
        true
    }

    /// Replaces the active sequence wholesale, e.g. after loading a session.
    pub async fn replace_messages(
        &self,
        session_id: Option<SessionId>,
        messages: Vec<ChatMessage>,
    ) {
        let mut state = self.state.write().await;
        tracing::debug!(
            "[ConversationStore] Replacing {} messages with {} from session {:?}",
            state.messages.len(),
            messages.len(),
            session_id
        );
        state.messages = messages;
        state.session_id = session_id;
        state.generation += 1;
    }

    /// Empties the active sequence and forgets its session.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.messages.clear();
        state.session_id = None;
        state.generation += 1;
    }

    /// Binds the active conversation to a session, e.g. one just created.
    pub async fn set_session_id(&self, session_id: Option<SessionId>) {
        self.state.write().await.session_id = session_id;
    }
}
