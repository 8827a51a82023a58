//! # warden-cli
//!
//! Command-line interface for the Warden runtime.
//!
//! ## Commands
//!
//! - `warden init` — create or load a session (interactive wizard)
//! - `warden status` — show the session at a glance
//! - `warden propose` — write deterministic recon blocks for the scope
//! - `warden approve <id>` / `warden exec <id>` — gate and run a block
//! - `warden run -g <objective>` — the proposer-driven loop
//! - `warden key-init` — store the proposer API key
//! - `warden index` / `warden search` — session artifact retrieval
//! - `warden logs` — tail the audit trail

mod approval;
mod commands;
mod setup;

pub use approval::ConsoleApproval;
pub use commands::Cli;
