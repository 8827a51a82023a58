//! # warden-config
//!
//! The session is Warden's unit of authorization: one engagement, one
//! scope, one mode, one output directory. This crate owns the persisted
//! `session.json` schema, the `SessionStore` that loads and lays out a
//! session on disk, and the `SecretVault` used to resolve API credentials.
//!
//! A session config is immutable for the lifetime of a session once
//! loaded; it is only rewritten by re-running `warden init`.

pub mod loader;
pub mod schema;
pub mod secrets;

pub use loader::{SessionStore, SESSION_FILE};
pub use schema::{Roe, Scope, SessionConfig};
pub use secrets::{SecretBackend, SecretVault};
