//! Session domain module.
//!
//! This module contains the session and message domain models, the rename
//! dialog staging state and the repository interface used by the local backend.
//!
//! # Module Structure
//!
//! - `model`: Session identifiers and summaries (`SessionId`, `SessionSummary`)
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`, `DeliveryStatus`)
//! - `rename`: Rename dialog working state (`RenameDialogState`)
//! - `repository`: Repository trait for session persistence (`ChatRepository`)

mod message;
mod model;
mod rename;
mod repository;

// Re-export public API
pub use message::{ChatMessage, DeliveryStatus, MessageRole};
pub use model::{DEFAULT_SESSION_TITLE, SessionId, SessionSummary};
pub use rename::RenameDialogState;
pub use repository::ChatRepository;
