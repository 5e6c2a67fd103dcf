//! Test doubles shared by the application tests.

use async_trait::async_trait;
use firefly_core::completion::CompletionClient;
use firefly_core::error::{FireflyError, Result};
use firefly_core::session::{ChatMessage, ChatRepository};
use firefly_infrastructure::TomlChatRepository;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Completion client that echoes the last message unless told to fail.
#[derive(Default)]
pub(crate) struct ScriptedCompletion {
    fail_next: Mutex<Option<String>>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompletion {
    pub fn echo() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    pub fn last_history(&self) -> Vec<ChatMessage> {
        self.histories.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, history: &[ChatMessage]) -> Result<String> {
        self.histories.lock().unwrap().push(history.to_vec());
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(FireflyError::completion(Some(429), message));
        }
        let last = history.last().map(|m| m.content.as_str()).unwrap_or_default();
        Ok(format!("echo: {last}"))
    }
}

pub(crate) fn repository_in(temp_dir: &TempDir) -> Arc<dyn ChatRepository> {
    Arc::new(TomlChatRepository::new(temp_dir.path().join("chats.toml")))
}
