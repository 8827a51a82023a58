use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use warden_config::SessionStore;
use warden_core::{
    AuditEvent, ChatMessage, CommandBlock, EventKind, MemoryNote, Observation, Result, WardenError,
};
use warden_exec::{build_observation, run_command, CommandOutcome};
use warden_guard::authorize;
use warden_llm::Proposer;
use warden_memory::{AuditLog, ContextRetrieval, Journal};

use crate::approval::{ApprovalDecision, ApprovalHandler};
use crate::proposer::propose_blocks;

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);
/// Journal notes supplied to the completion question.
const COMPLETION_HISTORY: usize = 500;
/// Key lines copied into the journal after a block executes.
const JOURNAL_KEY_LINES: usize = 30;

/// What a finished loop did, for callers and tests.
#[derive(Debug, Default)]
pub struct LoopSummary {
    pub cycles: u32,
    pub blocks_executed: usize,
    pub blocks_skipped: usize,
    pub aborted: bool,
    /// True when the proposer affirmed the objective is complete.
    pub objective_met: bool,
}

enum BlockStatus {
    Executed,
    Skipped,
    Aborted,
}

/// Orchestrates repeated propose → approve → gate → execute → record
/// cycles against one session. Everything it writes goes through the
/// session-scoped journal and audit handles — no global state.
pub struct ProposalLoop<'a> {
    store: &'a SessionStore,
    proposer: Arc<dyn Proposer>,
    approval: Arc<dyn ApprovalHandler>,
    retrieval: Option<Arc<dyn ContextRetrieval>>,
    journal: Journal,
    audit: AuditLog,
    command_timeout: Duration,
}

impl<'a> ProposalLoop<'a> {
    pub fn new(
        store: &'a SessionStore,
        proposer: Arc<dyn Proposer>,
        approval: Arc<dyn ApprovalHandler>,
    ) -> Self {
        let journal = Journal::new(store.journal_path());
        let audit = AuditLog::new(store.audit_path());
        Self {
            store,
            proposer,
            approval,
            retrieval: None,
            journal,
            audit,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_retrieval(mut self, retrieval: Arc<dyn ContextRetrieval>) -> Self {
        self.retrieval = Some(retrieval);
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Pursue the objective until the proposer affirms completion, the
    /// operator declines to continue, or the kill switch fires.
    pub async fn run(&self, objective: &str) -> Result<LoopSummary> {
        let mut summary = LoopSummary::default();

        self.journal
            .append(&MemoryNote::user(format!("Objective: {objective}")))?;
        self.audit.append(&AuditEvent::new(
            EventKind::Plan,
            format!("objective: {objective}"),
        ))?;

        'cycles: loop {
            summary.cycles += 1;
            let blocks = propose_blocks(
                self.proposer.as_ref(),
                &self.journal,
                self.retrieval.as_deref(),
                self.store.config(),
                objective,
            )
            .await?;

            if blocks.is_empty() {
                warn!("proposer returned no usable blocks");
                self.audit.append(&AuditEvent::new(
                    EventKind::Error,
                    "proposer returned no usable blocks after retry and history fallback",
                ))?;
                if !self
                    .approval
                    .confirm_continue("The proposer returned no usable blocks. Continue?")
                    .await?
                {
                    break;
                }
                continue;
            }

            for block in &blocks {
                self.audit.append(
                    &AuditEvent::new(EventKind::Proposal, block.intent.clone())
                        .with_block(&block.id),
                )?;
                match self.execute_block_with_approval(block).await? {
                    BlockStatus::Executed => summary.blocks_executed += 1,
                    BlockStatus::Skipped => summary.blocks_skipped += 1,
                    BlockStatus::Aborted => {
                        summary.aborted = true;
                        break 'cycles;
                    }
                }
            }

            self.reindex_artifacts().await?;

            if self.objective_complete().await? {
                info!("proposer affirmed the objective is complete");
                summary.objective_met = true;
                break;
            }
        }

        Ok(summary)
    }

    /// Present a block for approval, then gate and run each of its
    /// commands in order. A hard-blocked command is skipped with an audit
    /// record; it never aborts its siblings.
    async fn execute_block_with_approval(&self, block: &CommandBlock) -> Result<BlockStatus> {
        let decision = self
            .approval
            .review_block(block, self.store.config())
            .await?;

        match decision {
            ApprovalDecision::Declined => {
                self.journal.append(
                    &MemoryNote::user(format!("Approval for {}: no", block.id))
                        .for_block(&block.id),
                )?;
                self.audit.append(
                    &AuditEvent::new(EventKind::Note, "block declined").with_block(&block.id),
                )?;
                return Ok(BlockStatus::Skipped);
            }
            ApprovalDecision::Abort => {
                self.audit.append(
                    &AuditEvent::new(EventKind::Note, "kill switch invoked, session aborted")
                        .with_block(&block.id),
                )?;
                return Ok(BlockStatus::Aborted);
            }
            ApprovalDecision::Approved => {
                self.journal.append(
                    &MemoryNote::user(format!("Approval for {}: yes", block.id))
                        .for_block(&block.id),
                )?;
            }
        }

        let mut results: Vec<CommandOutcome> = Vec::new();
        for (idx, cmd) in block.commands.iter().enumerate() {
            let gate = authorize(self.store.config(), cmd);
            if !gate.executable_with_approval() {
                warn!(cmd = %cmd, reason = %gate.reason, "command hard-blocked, skipping");
                let mut event = AuditEvent::new(EventKind::Error, gate.reason.clone())
                    .with_block(&block.id)
                    .with_command(cmd);
                if gate.reason.starts_with("out of scope") {
                    event = event.scope_violation();
                }
                self.audit.append(&event)?;
                continue;
            }

            self.audit.append(
                &AuditEvent::new(EventKind::Exec, gate.reason.clone())
                    .with_block(&block.id)
                    .with_command(cmd),
            )?;

            match run_command(self.store.root(), &block.id, idx, cmd, self.command_timeout).await
            {
                Ok(outcome) => results.push(outcome),
                Err(e @ WardenError::Spawn { .. }) => {
                    // Fatal for this command only.
                    warn!(cmd = %cmd, error = %e, "command failed to start");
                    self.audit.append(
                        &AuditEvent::new(EventKind::Error, e.to_string())
                            .with_block(&block.id)
                            .with_command(cmd),
                    )?;
                }
                Err(e) => return Err(e),
            }
        }

        let obs = build_observation(&block.id, &results);
        self.record_observation(block, &obs)?;
        Ok(BlockStatus::Executed)
    }

    fn record_observation(&self, block: &CommandBlock, obs: &Observation) -> Result<()> {
        self.audit.append(&AuditEvent::observation(obs))?;
        let snippet = obs
            .key_lines
            .iter()
            .take(JOURNAL_KEY_LINES)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        self.journal.append(
            &MemoryNote::user(format!(
                "Executed block {}. Summary: {}\nKey lines:\n{snippet}",
                block.id, obs.summary
            ))
            .for_block(&block.id),
        )?;
        Ok(())
    }

    /// Refresh the retrieval index over whatever this batch produced. A
    /// failure is a recoverable, audited event — never silent, never
    /// fatal.
    async fn reindex_artifacts(&self) -> Result<()> {
        let Some(retrieval) = &self.retrieval else {
            return Ok(());
        };
        match retrieval.index_session(self.store.root()).await {
            Ok(count) => {
                info!(count, "session artifacts reindexed");
            }
            Err(e) => {
                warn!(error = %e, "artifact reindex failed");
                self.audit.append(&AuditEvent::new(
                    EventKind::Error,
                    format!("artifact reindex failed: {e}"),
                ))?;
            }
        }
        Ok(())
    }

    /// Closed yes/no completion question over the full journal. A
    /// transport failure counts as "not done" — the loop carries on.
    async fn objective_complete(&self) -> Result<bool> {
        let mut messages = vec![ChatMessage::system(
            "You are evaluating progress. Consider the conversation so far and answer \
             with a single word: DONE or CONTINUE.",
        )];
        for note in self.journal.load(Some(COMPLETION_HISTORY))? {
            messages.push(ChatMessage::from(&note));
        }
        messages.push(ChatMessage::user("Are we done? Reply: DONE or CONTINUE."));

        match self.proposer.chat(&messages).await {
            Ok(ack) => {
                self.journal.append(&MemoryNote::assistant(ack.as_str()))?;
                Ok(ack.to_uppercase().contains("DONE"))
            }
            Err(e) => {
                warn!(error = %e, "completion check failed, continuing");
                Ok(false)
            }
        }
    }
}

/// Execute one block outside the loop (the `warden exec` path). The
/// block's approval marker must exist, and every command is pre-checked
/// before anything runs: a single hard block rejects the whole block
/// with its reason.
pub async fn execute_approved_block(
    store: &SessionStore,
    block: &CommandBlock,
    command_timeout: Duration,
) -> Result<Observation> {
    if !store.approval_marker(&block.id).exists() {
        return Err(WardenError::ApprovalRequired(format!(
            "block {} has no approval marker",
            block.id
        )));
    }

    let audit = AuditLog::new(store.audit_path());

    for cmd in &block.commands {
        let gate = authorize(store.config(), cmd);
        if !gate.executable_with_approval() {
            let mut event = AuditEvent::new(EventKind::Error, gate.reason.clone())
                .with_block(&block.id)
                .with_command(cmd);
            if gate.reason.starts_with("out of scope") {
                event = event.scope_violation();
                audit.append(&event)?;
                return Err(WardenError::Scope(gate.reason));
            }
            audit.append(&event)?;
            return Err(WardenError::Guardrail(gate.reason));
        }
    }

    let mut results = Vec::new();
    for (idx, cmd) in block.commands.iter().enumerate() {
        audit.append(
            &AuditEvent::new(EventKind::Exec, String::new())
                .with_block(&block.id)
                .with_command(cmd),
        )?;
        results.push(run_command(store.root(), &block.id, idx, cmd, command_timeout).await?);
    }

    let obs = build_observation(&block.id, &results);
    audit.append(&AuditEvent::observation(&obs))?;
    Ok(obs)
}
