use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use warden_core::{AuditEvent, Result};

/// Append-only NDJSON audit trail: one object per significant event.
///
/// Prior lines are never rewritten or deleted. Readers tolerate unknown
/// fields (the event schema may grow) and skip lines they cannot parse.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(&self, event: &AuditEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(event)?)?;
        debug!(kind = ?event.kind, block_id = ?event.block_id, "audit event recorded");
        Ok(())
    }

    /// The most recent `limit` events, oldest first.
    pub fn tail(&self, limit: usize) -> Result<Vec<AuditEvent>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let mut events: Vec<AuditEvent> = raw
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();
        if events.len() > limit {
            events.drain(..events.len() - limit);
        }
        Ok(events)
    }
}
