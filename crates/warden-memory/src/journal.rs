use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use warden_core::{MemoryNote, Result};

/// Append-only JSONL journal of session notes.
///
/// The journal is what the proposal loop feeds back to the proposer:
/// objectives, approval decisions, execution summaries, raw proposer
/// replies. Corrupt lines are skipped on load so one bad write can never
/// poison a session.
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(&self, note: &MemoryNote) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(note)?)?;
        Ok(())
    }

    /// Load journal notes, oldest first. With `last_n`, only the most
    /// recent `n` are returned.
    pub fn load(&self, last_n: Option<usize>) -> Result<Vec<MemoryNote>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let mut notes: Vec<MemoryNote> = raw
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();
        if let Some(n) = last_n {
            if notes.len() > n {
                notes.drain(..notes.len() - n);
            }
        }
        Ok(notes)
    }
}
