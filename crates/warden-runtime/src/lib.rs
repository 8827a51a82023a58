//! # warden-runtime
//!
//! Drives the session: ask the proposer for command blocks, collect an
//! approval, pass every command through the guard, execute what survives,
//! and record everything in the journal and audit log. Strictly
//! sequential — one command at a time, one block at a time; the only
//! suspension points are the proposer call, the approval prompt, and the
//! running subprocess.

pub mod approval;
pub mod blocks;
pub mod proposal_loop;
pub mod proposer;

pub use approval::{ApprovalDecision, ApprovalHandler, AutoApproval};
pub use blocks::{load_blocks, propose_recon_blocks, write_blocks};
pub use proposal_loop::{execute_approved_block, LoopSummary, ProposalLoop};
pub use proposer::{build_system_prompt, normalize_block, propose_blocks};
