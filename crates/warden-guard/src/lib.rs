//! # warden-guard
//!
//! The gate every proposed command passes before it can touch a target:
//!
//! - [`classify`] assigns a risk tier and read-only flag to a raw command
//!   string (deny patterns first, then head-token heuristics).
//! - [`scope`] decides whether the targets and paths a command references
//!   fall inside the session's authorized scope.
//! - [`authorize`] combines both with the session [`Mode`] into a single
//!   [`Decision`].
//!
//! Everything in this crate is a pure function over its inputs — no I/O,
//! no clocks, fully deterministic.
//!
//! [`Mode`]: warden_core::Mode
//! [`Decision`]: authorize::Decision

pub mod authorize;
pub mod classify;
pub mod scope;

pub use authorize::{authorize, Decision};
pub use classify::{classify, Classification};
pub use scope::{check_scope, ScopeCheck};
