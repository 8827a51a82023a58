use tracing::info;

use warden_config::SessionConfig;
use warden_core::{Mode, RiskTier};

use crate::classify::classify;
use crate::scope::check_scope;

/// The authorizer's verdict for one command under one session.
///
/// `hard_block` marks outcomes that approval can never override: a deny
/// pattern, a scope violation, or a mode that forbids execution outright.
/// Callers branch on this field rather than matching on reason text.
#[derive(Debug, Clone)]
pub struct Decision {
    pub allow: bool,
    pub needs_approval: bool,
    pub hard_block: bool,
    pub reason: String,
}

impl Decision {
    fn allowed(reason: String) -> Self {
        Self {
            allow: true,
            needs_approval: false,
            hard_block: false,
            reason,
        }
    }

    fn approval(reason: String) -> Self {
        Self {
            allow: false,
            needs_approval: true,
            hard_block: false,
            reason,
        }
    }

    fn blocked(reason: String) -> Self {
        Self {
            allow: false,
            needs_approval: true,
            hard_block: true,
            reason,
        }
    }

    /// Whether execution may proceed once a human has approved the
    /// enclosing block.
    pub fn executable_with_approval(&self) -> bool {
        self.allow || !self.hard_block
    }
}

/// Combine classification, scope resolution, and the session mode into a
/// single decision. Pure: no side effects beyond a trace line.
pub fn authorize(cfg: &SessionConfig, cmd: &str) -> Decision {
    let class = classify(cmd);
    if let Some(pattern) = &class.denied_pattern {
        let decision = Decision::blocked(format!("denied pattern: {pattern}"));
        info!(cmd, reason = %decision.reason, "command blocked by guardrail");
        return decision;
    }

    let scope = check_scope(&cfg.scope, cmd);
    if !scope.in_scope {
        let decision = Decision::blocked(format!("out of scope: {}", scope.reason));
        info!(cmd, reason = %decision.reason, "command blocked by scope");
        return decision;
    }

    match cfg.mode {
        Mode::PlanOnly | Mode::Simulate => {
            Decision::blocked(format!("mode {} forbids execution", cfg.mode))
        }
        Mode::AutoReadonly => {
            if class.risk == RiskTier::Low && class.read_only_ok {
                Decision::allowed(format!("allowed in AUTO_READONLY: {}", class.reason))
            } else {
                Decision::approval(format!("needs approval in AUTO_READONLY: {}", class.reason))
            }
        }
        Mode::ExecuteWithApproval => {
            // Classification is surfaced as context; the answer is always
            // "ask a human".
            Decision::approval(format!("approval required: {}", class.reason))
        }
    }
}
