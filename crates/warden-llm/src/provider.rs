use async_trait::async_trait;
use warden_core::{ChatMessage, Result};

/// The Model Proposer collaborator: turns a conversation into free text.
///
/// Implementations may be remote and slow; callers treat every error as
/// recoverable and never let a failed call corrupt session state.
#[async_trait]
pub trait Proposer: Send + Sync {
    /// Human-readable provider name, e.g. "openai", "mock".
    fn name(&self) -> &str;

    /// Send the conversation and return the raw reply text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;
}
