use async_trait::async_trait;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use warden_config::SessionConfig;
use warden_core::{CommandBlock, Result, WardenError};
use warden_runtime::{ApprovalDecision, ApprovalHandler};

/// Human approval at the terminal. Typing the session kill-switch phrase
/// at the block prompt aborts the whole session.
pub struct ConsoleApproval;

#[async_trait]
impl ApprovalHandler for ConsoleApproval {
    async fn review_block(
        &self,
        block: &CommandBlock,
        cfg: &SessionConfig,
    ) -> Result<ApprovalDecision> {
        println!();
        println!(
            "{} {} — {}",
            style("Proposed").cyan().bold(),
            style(&block.id).bold(),
            block.intent
        );
        if !block.scope_check.is_empty() {
            println!("  scope: {}", block.scope_check);
        }
        println!("  risk: {}  rollback: {}", block.risk, block.rollback);
        println!("  commands:");
        for cmd in &block.commands {
            println!("    - {cmd}");
        }

        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Approve block {}? [y/N]", block.id))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| WardenError::Session(format!("approval prompt failed: {e}")))?;

        let trimmed = answer.trim();
        if trimmed.eq_ignore_ascii_case(&cfg.kill_switch) {
            println!("{}", style("Kill switch invoked — aborting session.").red());
            return Ok(ApprovalDecision::Abort);
        }
        if matches!(trimmed.to_lowercase().as_str(), "y" | "yes") {
            Ok(ApprovalDecision::Approved)
        } else {
            println!("{}", style("Skipped.").yellow());
            Ok(ApprovalDecision::Declined)
        }
    }

    async fn confirm_continue(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| WardenError::Session(format!("confirm prompt failed: {e}")))
    }
}
