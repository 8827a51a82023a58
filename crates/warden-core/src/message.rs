use serde::{Deserialize, Serialize};

/// Who produced a chat message or journal note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    #[default]
    User,
    Assistant,
}

/// One turn of the proposer conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// One line of the session memory journal. Notes carry what happened in a
/// cycle (objective, approvals, execution summaries, raw proposer replies)
/// so the loop can be resumed and the proposer re-grounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryNote {
    #[serde(default)]
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl MemoryNote {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            meta: Default::default(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Tag the note with the block it concerns.
    pub fn for_block(mut self, block_id: &str) -> Self {
        self.meta
            .insert("block_id".into(), serde_json::Value::String(block_id.into()));
        self
    }
}

impl From<&MemoryNote> for ChatMessage {
    fn from(note: &MemoryNote) -> Self {
        ChatMessage {
            role: note.role,
            content: note.content.clone(),
        }
    }
}
