use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The kind of a session audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Plan,
    Proposal,
    Exec,
    Observation,
    Finding,
    Task,
    Note,
    Error,
}

/// One line of the append-only session audit log.
///
/// Events are never rewritten or deleted. Readers must tolerate fields
/// added by future versions, so this struct deliberately does not deny
/// unknown fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    #[serde(default = "Utc::now")]
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default = "default_true")]
    pub scope_ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_out: Option<u64>,
    #[serde(default)]
    pub summary: String,
}

fn default_true() -> bool {
    true
}

impl AuditEvent {
    pub fn new(kind: EventKind, summary: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            kind,
            block_id: None,
            scope_ok: true,
            cmd: None,
            exit_code: None,
            bytes_out: None,
            summary: summary.into(),
        }
    }

    pub fn with_block(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }

    pub fn with_command(mut self, cmd: impl Into<String>) -> Self {
        self.cmd = Some(cmd.into());
        self
    }

    pub fn scope_violation(mut self) -> Self {
        self.scope_ok = false;
        self
    }

    /// Build an observation event carrying the aggregate execution result.
    pub fn observation(obs: &Observation) -> Self {
        Self {
            ts: obs.ts,
            kind: EventKind::Observation,
            block_id: Some(obs.block_id.clone()),
            scope_ok: true,
            cmd: None,
            exit_code: Some(obs.exit_code),
            bytes_out: Some(obs.bytes_out),
            summary: obs.summary.clone(),
        }
    }
}

/// Aggregated result of executing every command in one block. Derived data:
/// an observation only exists as part of the audit trail that references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default = "Utc::now")]
    pub ts: DateTime<Utc>,
    pub block_id: String,
    /// Worst exit code over all commands — the numeric maximum.
    pub exit_code: i32,
    /// Bounded head+tail extract of the combined output.
    pub key_lines: Vec<String>,
    /// Total UTF-8 byte count of captured stdout.
    pub bytes_out: u64,
    pub summary: String,
    /// Redacted per-command log files, in execution order.
    pub log_paths: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_event_serializes_kind_as_type() {
        let ev = AuditEvent::new(EventKind::Exec, "ran a thing").with_block("CB-1");
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"exec\""));
        assert!(json.contains("\"block_id\":\"CB-1\""));
    }

    #[test]
    fn audit_reader_tolerates_unknown_fields() {
        let raw = r#"{"ts":"2026-08-06T00:00:00Z","type":"note","summary":"hi","future_field":42}"#;
        let ev: AuditEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(ev.kind, EventKind::Note);
        assert!(ev.scope_ok);
    }
}
