//! In-process backend gateway.
//!
//! Implements [`BackendGateway`] on top of a [`ChatRepository`] for storage and
//! a [`CompletionClient`] for replies, and remembers which session the user is
//! currently working in. A send without a session id always opens a new
//! session, so a cleared conversation never continues an old one.

use async_trait::async_trait;
use firefly_core::completion::CompletionClient;
use firefly_core::error::Result;
use firefly_core::gateway::{BackendGateway, RenameOutcome, SendReply};
use firefly_core::session::{
    ChatMessage, ChatRepository, DEFAULT_SESSION_TITLE, MessageRole, SessionId, SessionSummary,
};
use std::sync::{Arc, RwLock};

pub struct LocalGateway {
    repository: Arc<dyn ChatRepository>,
    completion: Arc<dyn CompletionClient>,
    current_session: RwLock<Option<SessionId>>,
}

impl LocalGateway {
    pub fn new(repository: Arc<dyn ChatRepository>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            repository,
            completion,
            current_session: RwLock::new(None),
        }
    }

    /// Session most recently created, opened or sent to.
    pub fn current_session(&self) -> Option<SessionId> {
        *self
            .current_session
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn set_current_session(&self, session_id: Option<SessionId>) {
        *self
            .current_session
            .write()
            .unwrap_or_else(|e| e.into_inner()) = session_id;
    }

    async fn resolve_target(&self, session_id: Option<SessionId>) -> Result<SessionId> {
        if let Some(id) = session_id {
            return Ok(id);
        }
        let id = self.repository.create_session(DEFAULT_SESSION_TITLE).await?;
        tracing::info!("[LocalGateway] Created session {} for unbound message", id);
        Ok(id)
    }
}

#[async_trait]
impl BackendGateway for LocalGateway {
    async fn send_message(
        &self,
        session_id: Option<SessionId>,
        text: &str,
    ) -> Result<SendReply> {
        let target = self.resolve_target(session_id).await?;
        self.set_current_session(Some(target));

        self.repository
            .save_message(target, MessageRole::User, text)
            .await?;
        let history = self.repository.session_messages(target).await?;

        let content = match self.completion.complete(&history).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    "[LocalGateway] Completion failed for session {}: {}",
                    target,
                    e
                );
                return Err(e);
            }
        };

        self.repository
            .save_message(target, MessageRole::Assistant, &content)
            .await?;

        Ok(SendReply {
            session_id: target,
            content,
        })
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        self.repository.list_sessions().await
    }

    async fn create_session(&self) -> Result<SessionId> {
        let id = self.repository.create_session(DEFAULT_SESSION_TITLE).await?;
        self.set_current_session(Some(id));
        Ok(id)
    }

    async fn load_session_messages(&self, session_id: SessionId) -> Result<Vec<ChatMessage>> {
        let messages = self.repository.session_messages(session_id).await?;
        self.set_current_session(Some(session_id));
        Ok(messages)
    }

    async fn delete_session(&self, session_id: SessionId) -> Result<bool> {
        self.repository.delete_session(session_id).await?;
        if self.current_session() == Some(session_id) {
            self.set_current_session(None);
        }
        Ok(true)
    }

    async fn rename_session(
        &self,
        session_id: SessionId,
        new_title: &str,
    ) -> Result<RenameOutcome> {
        let title = new_title.trim();
        if title.is_empty() {
            return Ok(RenameOutcome::refused("Title cannot be empty"));
        }

        match self.repository.update_title(session_id, title).await {
            Ok(()) => Ok(RenameOutcome::accepted(title)),
            Err(e) => {
                tracing::info!("[LocalGateway] Rename of session {} refused: {}", session_id, e);
                Ok(RenameOutcome::refused(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedCompletion, repository_in};
    use tempfile::TempDir;

    fn gateway(temp_dir: &TempDir, completion: Arc<ScriptedCompletion>) -> LocalGateway {
        LocalGateway::new(repository_in(temp_dir), completion)
    }

    #[tokio::test]
    async fn test_first_send_creates_and_tracks_session() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = gateway(&temp_dir, Arc::new(ScriptedCompletion::echo()));

        let reply = gateway.send_message(None, "Hello").await.unwrap();

        assert_eq!(reply.session_id, SessionId(1));
        assert_eq!(reply.content, "echo: Hello");
        assert_eq!(gateway.current_session(), Some(SessionId(1)));

        let second = gateway.send_message(Some(reply.session_id), "Again").await.unwrap();
        assert_eq!(second.session_id, SessionId(1));
        assert_eq!(gateway.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unbound_send_never_reuses_current_session() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = gateway(&temp_dir, Arc::new(ScriptedCompletion::echo()));
        let first = gateway.send_message(None, "old topic").await.unwrap();

        let second = gateway.send_message(None, "fresh topic").await.unwrap();

        assert_eq!(first.session_id, SessionId(1));
        assert_eq!(second.session_id, SessionId(2));
        assert_eq!(gateway.current_session(), Some(SessionId(2)));
        assert_eq!(gateway.load_session_messages(first.session_id).await.unwrap().len(), 2);
        assert_eq!(
            gateway.load_session_messages(second.session_id).await.unwrap(),
            vec![ChatMessage::user("fresh topic"), ChatMessage::assistant("echo: fresh topic")]
        );
    }

    #[tokio::test]
    async fn test_send_passes_full_history_to_completion() {
        let temp_dir = TempDir::new().unwrap();
        let completion = Arc::new(ScriptedCompletion::echo());
        let gateway = gateway(&temp_dir, completion.clone());

        let reply = gateway.send_message(None, "one").await.unwrap();
        gateway.send_message(Some(reply.session_id), "two").await.unwrap();

        let last = completion.last_history();
        assert_eq!(
            last,
            vec![
                ChatMessage::user("one"),
                ChatMessage::assistant("echo: one"),
                ChatMessage::user("two"),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_to_explicit_session() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = gateway(&temp_dir, Arc::new(ScriptedCompletion::echo()));
        let first = gateway.create_session().await.unwrap();
        let second = gateway.create_session().await.unwrap();

        let reply = gateway.send_message(Some(first), "to first").await.unwrap();

        assert_eq!(reply.session_id, first);
        assert!(gateway.load_session_messages(second).await.unwrap().is_empty());
        assert_eq!(gateway.load_session_messages(first).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_completion_failure_keeps_user_message() {
        let temp_dir = TempDir::new().unwrap();
        let completion = Arc::new(ScriptedCompletion::echo());
        completion.fail_next("rate limited");
        let gateway = gateway(&temp_dir, completion);

        let err = gateway.send_message(None, "Hello").await.unwrap_err();

        assert!(err.is_completion());
        let stored = gateway.load_session_messages(SessionId(1)).await.unwrap();
        assert_eq!(stored, vec![ChatMessage::user("Hello")]);
    }

    #[tokio::test]
    async fn test_delete_current_session_forgets_it() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = gateway(&temp_dir, Arc::new(ScriptedCompletion::echo()));
        let id = gateway.create_session().await.unwrap();

        assert!(gateway.delete_session(id).await.unwrap());

        assert_eq!(gateway.current_session(), None);
        let reply = gateway.send_message(None, "fresh").await.unwrap();
        assert_eq!(reply.session_id, SessionId(2));
    }

    #[tokio::test]
    async fn test_load_switches_current_session() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = gateway(&temp_dir, Arc::new(ScriptedCompletion::echo()));
        let first = gateway.create_session().await.unwrap();
        gateway.create_session().await.unwrap();

        gateway.load_session_messages(first).await.unwrap();

        assert_eq!(gateway.current_session(), Some(first));
    }

    #[tokio::test]
    async fn test_rename_outcomes() {
        let temp_dir = TempDir::new().unwrap();
        let gateway = gateway(&temp_dir, Arc::new(ScriptedCompletion::echo()));
        let id = gateway.create_session().await.unwrap();

        let accepted = gateway.rename_session(id, "  Trip plans ").await.unwrap();
        assert_eq!(accepted, RenameOutcome::accepted("Trip plans"));
        assert_eq!(gateway.list_sessions().await.unwrap()[0].title, "Trip plans");

        let unknown = gateway.rename_session(SessionId(99), "X").await.unwrap();
        assert!(!unknown.success);
        assert!(unknown.error.unwrap().contains("99"));

        let blank = gateway.rename_session(id, "   ").await.unwrap();
        assert!(!blank.success);
    }
}
