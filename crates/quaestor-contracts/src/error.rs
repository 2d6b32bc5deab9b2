//! Error types for the QUAESTOR audit chain.
//!
//! All fallible operations in the QUAESTOR crates return `AuditResult<T>`.
//! Error variants carry enough context to explain why an audit record could
//! not be produced. There is deliberately no `InvalidInput` variant: required
//! fields are enforced by the type system, and the hashing step is
//! format-agnostic beyond that.

use thiserror::Error;

/// The unified error type for the QUAESTOR audit chain.
#[derive(Debug, Error)]
pub enum AuditError {
    /// No cryptographic digest backend is compiled into this build.
    ///
    /// Fatal for the call: no partial event is returned and the chain tip
    /// does not advance.
    #[error("no digest backend available: {reason}")]
    DigestUnavailable { reason: String },

    /// The selected digest backend failed to hash the canonical payload.
    ///
    /// Fatal for the call, same as `DigestUnavailable`: the chain tip is
    /// left exactly where it was.
    #[error("digest computation failed: {reason}")]
    DigestFailed { reason: String },

    /// The chain-tip lock was poisoned by a panicking writer.
    #[error("chain state corrupt: {reason}")]
    ChainStateCorrupt { reason: String },

    /// The canonical payload could not be serialized to JSON.
    #[error("canonical serialization failed: {reason}")]
    CanonicalizationFailed { reason: String },
}

/// Convenience alias used throughout the QUAESTOR crates.
pub type AuditResult<T> = Result<T, AuditError>;
