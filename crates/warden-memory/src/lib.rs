//! # warden-memory
//!
//! The session's persistent records, all append-only files under the
//! session root:
//!
//! - **Journal**: JSONL of proposer/operator notes — the loop's memory.
//! - **Audit log**: NDJSON of [`AuditEvent`]s — one line per significant
//!   event, never rewritten.
//! - **Context retrieval**: the collaborator interface for ranked text
//!   snippets over prior session artifacts, with a local word-overlap
//!   index as the default backend.
//!
//! All writers are single-threaded within a session; nothing here locks
//! beyond atomic appends.
//!
//! [`AuditEvent`]: warden_core::AuditEvent

pub mod audit;
pub mod journal;
pub mod retrieval;

pub use audit::AuditLog;
pub use journal::Journal;
pub use retrieval::{ArtifactIndex, ContextRetrieval, Snippet};
