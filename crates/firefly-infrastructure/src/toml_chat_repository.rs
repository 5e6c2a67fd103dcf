//! TOML-based ChatRepository implementation

use crate::dto::{ChatArchive, MessageRecord, SessionRecord};
use crate::paths::FireflyPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use chrono::Utc;
use firefly_core::config::StorageConfig;
use firefly_core::error::{FireflyError, Result};
use firefly_core::session::{ChatMessage, ChatRepository, MessageRole, SessionId, SessionSummary};
use std::path::PathBuf;
use std::sync::Mutex;

/// A repository that keeps every session in a single TOML archive.
///
/// ```text
/// chats.toml
/// ├── schema_version
/// ├── next_session_id
/// └── [[sessions]]
///     └── [[sessions.messages]]
/// ```
///
/// Every mutation is a locked read-modify-write of the whole archive followed
/// by an atomic replace.
pub struct TomlChatRepository {
    file: AtomicTomlFile<ChatArchive>,
    write_lock: Mutex<()>,
}

impl TomlChatRepository {
    /// Creates a repository backed by the archive at `path`.
    ///
    /// The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the archive at the configured location, or the default data path.
    pub fn from_config(paths: &FireflyPaths, storage: &StorageConfig) -> Self {
        let path = storage
            .chats_file
            .clone()
            .unwrap_or_else(|| paths.chats_file());
        tracing::info!("[TomlChatRepository] Using archive: {}", path.display());
        Self::new(path)
    }

    fn read(&self) -> Result<ChatArchive> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    fn write<R>(&self, f: impl FnOnce(&mut ChatArchive) -> Result<R>) -> Result<R> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.file.update(ChatArchive::default(), f)
    }
}

fn session_not_found(session_id: SessionId) -> FireflyError {
    FireflyError::not_found("Session", session_id.to_string())
}

#[async_trait]
impl ChatRepository for TomlChatRepository {
    async fn create_session(&self, title: &str) -> Result<SessionId> {
        let id = self.write(|archive| {
            let id = archive.next_session_id;
            archive.next_session_id += 1;
            archive
                .sessions
                .push(SessionRecord::new(id, title, Utc::now()));
            Ok(id)
        })?;

        tracing::debug!("[TomlChatRepository] Created session {}", id);
        Ok(SessionId(id))
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut sessions = self.read()?.sessions;
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(sessions.iter().map(SessionRecord::to_summary).collect())
    }

    async fn session_messages(&self, session_id: SessionId) -> Result<Vec<ChatMessage>> {
        let archive = self.read()?;
        let messages = archive
            .find(session_id.get())
            .map(|session| {
                session
                    .messages
                    .iter()
                    .cloned()
                    .map(MessageRecord::into_domain)
                    .collect()
            })
            .unwrap_or_default();
        Ok(messages)
    }

    async fn save_message(
        &self,
        session_id: SessionId,
        role: MessageRole,
        content: &str,
    ) -> Result<()> {
        self.write(|archive| {
            let session = archive
                .find_mut(session_id.get())
                .ok_or_else(|| session_not_found(session_id))?;
            session.messages.push(MessageRecord {
                role,
                content: content.to_string(),
                created_at: Utc::now(),
            });
            Ok(())
        })
    }

    async fn update_title(&self, session_id: SessionId, title: &str) -> Result<()> {
        self.write(|archive| {
            let session = archive
                .find_mut(session_id.get())
                .ok_or_else(|| session_not_found(session_id))?;
            session.title = title.to_string();
            session.updated_at = Utc::now();
            Ok(())
        })
    }

    async fn delete_session(&self, session_id: SessionId) -> Result<()> {
        let removed = self.write(|archive| {
            let before = archive.sessions.len();
            archive.sessions.retain(|s| s.id != session_id.get());
            Ok(before != archive.sessions.len())
        })?;

        if !removed {
            tracing::debug!(
                "[TomlChatRepository] Delete of unknown session {} ignored",
                session_id
            );
        }
        Ok(())
    }
}
