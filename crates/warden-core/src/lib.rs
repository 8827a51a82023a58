//! # warden-core
//!
//! Core types, errors, and primitives for the Warden guarded execution
//! runtime. This crate defines the shared vocabulary used by every other
//! crate in the workspace: session modes, risk tiers, command blocks,
//! observations, and audit events. It performs no I/O.

pub mod block;
pub mod error;
pub mod event;
pub mod message;
pub mod types;

pub use block::CommandBlock;
pub use error::{Result, WardenError};
pub use event::{AuditEvent, EventKind, Observation};
pub use message::{ChatMessage, ChatRole, MemoryNote};
pub use types::{Mode, RiskTier};
