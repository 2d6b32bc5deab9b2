//! # quaestor-contracts
//!
//! Shared types and errors for the QUAESTOR audit chain.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod event;

pub use error::{AuditError, AuditResult};
pub use event::{ActorRole, AuditEvent, AuditEventInput};
