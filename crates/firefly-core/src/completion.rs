//! Chat completion client trait.

use crate::error::Result;
use crate::session::ChatMessage;
use async_trait::async_trait;

/// A language-model client that produces the next assistant reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the assistant reply for the given conversation history.
    ///
    /// The last message of `history` is the user message being answered.
    async fn complete(&self, history: &[ChatMessage]) -> Result<String>;
}
