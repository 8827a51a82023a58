use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RiskTier;

/// An atomic, ordered group of commands proposed together with a shared
/// intent and risk tier. Blocks are immutable once created; re-executing a
/// block is a new audit event, never a mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBlock {
    /// Unique within a session, e.g. `CB-20260806-001` or `AI-003`.
    pub id: String,
    /// What the proposer intends to learn or achieve.
    pub intent: String,
    /// The proposer's justification that the block stays in scope.
    pub scope_check: String,
    /// Conditions the proposer assumed hold before execution.
    #[serde(default)]
    pub preconditions: Vec<String>,
    /// Raw command strings, in execution order.
    pub commands: Vec<String>,
    /// What the proposer expects the output to show.
    pub expected_observation: String,
    #[serde(default)]
    pub risk: RiskTier,
    /// How to undo the block's effects, if any.
    #[serde(default = "default_rollback")]
    pub rollback: String,
    #[serde(default = "Utc::now")]
    pub created_ts: DateTime<Utc>,
}

fn default_rollback() -> String {
    "None (read-only)".to_string()
}

impl CommandBlock {
    /// Create a block with the given id, intent, and commands; remaining
    /// fields take their defaults.
    pub fn new(
        id: impl Into<String>,
        intent: impl Into<String>,
        commands: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            intent: intent.into(),
            scope_check: String::new(),
            preconditions: Vec::new(),
            commands,
            expected_observation: String::new(),
            risk: RiskTier::Low,
            rollback: default_rollback(),
            created_ts: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_minimal_fields() {
        let raw = r#"{
            "id": "CB-1",
            "intent": "dns lookup",
            "scope_check": "example.com in scope",
            "commands": ["dig +short example.com"],
            "expected_observation": "A records"
        }"#;
        let block: CommandBlock = serde_json::from_str(raw).unwrap();
        assert_eq!(block.risk, RiskTier::Low);
        assert_eq!(block.rollback, "None (read-only)");
        assert!(block.preconditions.is_empty());
    }

    #[test]
    fn command_order_is_preserved() {
        let block = CommandBlock::new(
            "CB-2",
            "ordered",
            vec!["first".into(), "second".into(), "third".into()],
        );
        let json = serde_json::to_string(&block).unwrap();
        let back: CommandBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back.commands, vec!["first", "second", "third"]);
    }
}
