use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use warden_core::{Result, WardenError};

use crate::schema::SessionConfig;

pub const SESSION_FILE: &str = "session.json";

/// Loads, persists, and lays out a session on disk.
///
/// The store owns the session root directory and the canonical paths of
/// everything under it. Components that append audit or journal records
/// receive those paths from here — there are no process-wide singletons.
#[derive(Debug)]
pub struct SessionStore {
    root: PathBuf,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new session at `config.output_dir`, persisting the config
    /// and preparing the directory layout.
    pub fn create(config: SessionConfig) -> Result<Self> {
        let root = config.output_dir.clone();
        fs::create_dir_all(&root)?;
        let store = Self { root, config };
        store.ensure_layout()?;
        store.save()?;
        info!(root = %store.root.display(), "session created");
        Ok(store)
    }

    /// Load an existing session from `root/session.json`.
    ///
    /// Fails closed: a missing file, unreadable directory, or any schema
    /// mismatch rejects the session outright — no partial session is
    /// ever constructed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SESSION_FILE);
        let raw = fs::read_to_string(&path).map_err(|e| {
            WardenError::Session(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: SessionConfig =
            serde_json::from_str(&raw).map_err(|e| WardenError::SessionSchema {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let store = Self {
            root: root.to_path_buf(),
            config,
        };
        store.ensure_layout()?;
        info!(root = %store.root.display(), mode = %store.config.mode, "session loaded");
        Ok(store)
    }

    /// Whether a session already exists under `root`.
    pub fn exists(root: &Path) -> bool {
        root.join(SESSION_FILE).is_file()
    }

    /// Persist the config. Written atomically (temp file + rename) so a
    /// crash can never leave a truncated session.json behind.
    pub fn save(&self) -> Result<()> {
        let path = self.root.join(SESSION_FILE);
        let body = serde_json::to_string_pretty(&self.config)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &body)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ── Layout ─────────────────────────────────────────────────

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn evidence_dir(&self) -> PathBuf {
        self.root.join("evidence")
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.root.join("memory")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.memory_dir().join("messages.jsonl")
    }

    pub fn audit_path(&self) -> PathBuf {
        self.root.join("audit.jsonl")
    }

    pub fn blocks_path(&self) -> PathBuf {
        self.root.join("proposed_blocks.json")
    }

    pub fn approval_marker(&self, block_id: &str) -> PathBuf {
        self.root.join(format!("{block_id}.approved"))
    }

    fn ensure_layout(&self) -> Result<()> {
        fs::create_dir_all(self.logs_dir())?;
        fs::create_dir_all(self.evidence_dir())?;
        fs::create_dir_all(self.memory_dir())?;
        for touch in [self.audit_path(), self.journal_path(), self.root.join("journal.md")] {
            if !touch.exists() {
                fs::write(&touch, "")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_session_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SessionStore::load(dir.path()).is_err());
    }
}
