use thiserror::Error;

/// Unified error type for the entire Warden runtime.
#[derive(Error, Debug)]
pub enum WardenError {
    // ── Session errors ─────────────────────────────────────────
    #[error("session error: {0}")]
    Session(String),

    #[error("session config rejected: {path}: {reason}")]
    SessionSchema { path: String, reason: String },

    // ── Gate errors ────────────────────────────────────────────
    #[error("out of scope: {0}")]
    Scope(String),

    #[error("denied by guardrail: {0}")]
    Guardrail(String),

    #[error("approval required: {0}")]
    ApprovalRequired(String),

    // ── Execution errors ───────────────────────────────────────
    #[error("command failed to start: {command}: {reason}")]
    Spawn { command: String, reason: String },

    // ── Proposer errors ────────────────────────────────────────
    #[error("proposer error: {0}")]
    Proposer(String),

    // ── Memory / retrieval errors ──────────────────────────────
    #[error("memory error: {0}")]
    Memory(String),

    #[error("retrieval error: {0}")]
    Retrieval(String),

    // ── Secret store errors ────────────────────────────────────
    #[error("secret store error: {0}")]
    Secret(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WardenError>;
