use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session-wide execution policy. Fixed at session creation — there are no
/// runtime transitions between modes.
///
/// - **PlanOnly**: propose and record, never execute.
/// - **ExecuteWithApproval**: every command requires an explicit approval.
/// - **AutoReadonly**: low-risk read-only commands run automatically,
///   everything else requires approval.
/// - **Simulate**: dry-run twin of PlanOnly; nothing executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    PlanOnly,
    ExecuteWithApproval,
    AutoReadonly,
    Simulate,
}

impl Mode {
    /// All modes, in wizard display order.
    pub const ALL: [Mode; 4] = [
        Mode::PlanOnly,
        Mode::ExecuteWithApproval,
        Mode::AutoReadonly,
        Mode::Simulate,
    ];

    /// Whether this mode can ever reach the executor.
    pub fn executes(&self) -> bool {
        match self {
            Mode::PlanOnly | Mode::Simulate => false,
            Mode::ExecuteWithApproval | Mode::AutoReadonly => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::PlanOnly => "PLAN_ONLY",
            Mode::ExecuteWithApproval => "EXECUTE_WITH_APPROVAL",
            Mode::AutoReadonly => "AUTO_READONLY",
            Mode::Simulate => "SIMULATE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLAN_ONLY" => Ok(Mode::PlanOnly),
            "EXECUTE_WITH_APPROVAL" => Ok(Mode::ExecuteWithApproval),
            "AUTO_READONLY" => Ok(Mode::AutoReadonly),
            "SIMULATE" => Ok(Mode::Simulate),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Risk tier assigned to a proposed command. Ordered so the riskier tier
/// dominates when aggregating.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&Mode::AutoReadonly).unwrap();
        assert_eq!(json, "\"AUTO_READONLY\"");
        let back: Mode = serde_json::from_str("\"PLAN_ONLY\"").unwrap();
        assert_eq!(back, Mode::PlanOnly);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<Mode>("\"YOLO\"").is_err());
        assert!("YOLO".parse::<Mode>().is_err());
    }

    #[test]
    fn risk_ordering_favours_medium() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert_eq!(RiskTier::Low.max(RiskTier::Medium), RiskTier::Medium);
    }
}
