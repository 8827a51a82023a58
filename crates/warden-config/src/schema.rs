use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use warden_core::Mode;

/// The targets and filesystem roots a session is permitted to act against.
///
/// Denylist membership always wins over allowlist membership, even for an
/// exact match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scope {
    /// Informational only — CIDR ranges are recorded but not enforced.
    #[serde(default)]
    pub cidrs: Vec<String>,
    /// Allowed domains; a strict subdomain of an entry is also allowed.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Allowed hosts and IPs, matched exactly.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Roots that absolute filesystem paths must resolve under.
    #[serde(default = "default_paths")]
    pub paths: Vec<PathBuf>,
    /// Explicit denylist of targets; overrides every allow entry.
    #[serde(default)]
    pub out_of_scope: Vec<String>,
}

fn default_paths() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            cidrs: Vec::new(),
            domains: Vec::new(),
            hosts: Vec::new(),
            paths: default_paths(),
            out_of_scope: Vec::new(),
        }
    }
}

/// Rules of engagement. Recorded with the session and surfaced to the
/// proposer; rate limits and time windows are informational in this
/// version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roe {
    #[serde(default)]
    pub rate_limit_per_sec: Option<u32>,
    /// Engagement window as a pair of ISO-8601 timestamps.
    #[serde(default)]
    pub time_window: Option<(String, String)>,
    /// Assets that must never be touched regardless of scope.
    #[serde(default)]
    pub no_touch: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The single source of truth for a session. Persisted as `session.json`
/// in the session root; must round-trip exactly and must reject unknown
/// fields rather than silently coercing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Free-text statement (or link) establishing authorization to test.
    pub authorization_doc: String,
    pub scope: Scope,
    pub roe: Roe,
    #[serde(default = "default_mode")]
    pub mode: Mode,
    /// Session root; all logs, journals, and evidence live under it.
    pub output_dir: PathBuf,
    /// Phrase that aborts the session when typed at any prompt.
    #[serde(default = "default_kill_switch")]
    pub kill_switch: String,
}

fn default_mode() -> Mode {
    Mode::AutoReadonly
}

fn default_kill_switch() -> String {
    "ABORT WARDEN NOW".to_string()
}

impl SessionConfig {
    /// A minimal config for the given output root, used by the init
    /// wizard as its starting point.
    pub fn with_output_dir(output_dir: PathBuf) -> Self {
        Self {
            authorization_doc: String::new(),
            scope: Scope::default(),
            roe: Roe::default(),
            mode: default_mode(),
            output_dir,
            kill_switch: default_kill_switch(),
        }
    }
}
