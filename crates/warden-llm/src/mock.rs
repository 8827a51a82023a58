//! Mock proposer for deterministic testing. Returns queued replies
//! without any network traffic and records every request for assertions.

use async_trait::async_trait;
use std::sync::Mutex;

use warden_core::{ChatMessage, Result, WardenError};

use crate::provider::Proposer;

#[derive(Clone)]
struct MockReply {
    text: String,
    error: Option<String>,
}

/// A proposer that replays a queue of canned replies.
///
/// # Example
/// ```
/// use warden_llm::MockProposer;
/// let proposer = MockProposer::new().with_reply("[]");
/// ```
#[derive(Default)]
pub struct MockProposer {
    replies: Mutex<Vec<MockReply>>,
    /// Every conversation this proposer received, for test assertions.
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockProposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply text.
    pub fn with_reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply {
            text: text.to_string(),
            error: None,
        });
        self
    }

    /// Queue an error.
    pub fn with_error(self, message: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply {
            text: String::new(),
            error: Some(message.to_string()),
        });
        self
    }

    fn next_reply(&self) -> MockReply {
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            MockReply {
                text: "(mock: no more queued replies)".to_string(),
                error: None,
            }
        } else {
            replies.remove(0)
        }
    }
}

#[async_trait]
impl Proposer for MockProposer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let reply = self.next_reply();
        if let Some(error) = reply.error {
            return Err(WardenError::Proposer(error));
        }
        Ok(reply.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_queue_order() {
        let p = MockProposer::new().with_reply("one").with_reply("two");
        assert_eq!(p.chat(&[]).await.unwrap(), "one");
        assert_eq!(p.chat(&[]).await.unwrap(), "two");
        assert!(p.chat(&[]).await.unwrap().contains("no more queued"));
    }

    #[tokio::test]
    async fn errors_surface_as_proposer_errors() {
        let p = MockProposer::new().with_error("boom");
        let err = p.chat(&[]).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn records_requests() {
        let p = MockProposer::new().with_reply("ok");
        p.chat(&[ChatMessage::user("hello")]).await.unwrap();
        assert_eq!(p.requests.lock().unwrap().len(), 1);
    }
}
