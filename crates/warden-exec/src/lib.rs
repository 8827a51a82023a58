//! # warden-exec
//!
//! Runs exactly one authorized command at a time: argument-vector spawn
//! (never a shell), working directory pinned to the session root, a hard
//! per-command timeout, secret redaction on both captured streams, and
//! per-command log files. The observation builder folds a block's command
//! results into a bounded, human-scannable summary.

pub mod executor;
pub mod observe;
pub mod redact;

pub use executor::{run_command, CommandOutcome, TIMEOUT_EXIT_CODE};
pub use observe::build_observation;
pub use redact::redact;
