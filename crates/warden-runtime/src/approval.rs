use async_trait::async_trait;

use warden_config::SessionConfig;
use warden_core::{CommandBlock, Result};

/// Outcome of presenting a block to whoever holds approval authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approved,
    Declined,
    /// The operator invoked the kill switch; the whole session stops.
    Abort,
}

/// Whoever may approve a proposed block: a human at a console prompt, or
/// an automatic policy for unattended runs. Implementations must honor
/// the session kill-switch phrase wherever they read operator input.
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    /// Present one block and return the decision.
    async fn review_block(
        &self,
        block: &CommandBlock,
        cfg: &SessionConfig,
    ) -> Result<ApprovalDecision>;

    /// Ask whether the loop should continue after a recoverable failure
    /// (e.g. the proposer returned nothing usable).
    async fn confirm_continue(&self, prompt: &str) -> Result<bool>;
}

/// Approves every block without prompting. The per-command authorizer
/// still runs afterwards: deny patterns, scope violations, and plan-only
/// modes hard-block regardless of block approval. Never continues past
/// proposer failures, so an unattended loop cannot spin.
pub struct AutoApproval;

#[async_trait]
impl ApprovalHandler for AutoApproval {
    async fn review_block(
        &self,
        _block: &CommandBlock,
        _cfg: &SessionConfig,
    ) -> Result<ApprovalDecision> {
        Ok(ApprovalDecision::Approved)
    }

    async fn confirm_continue(&self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
