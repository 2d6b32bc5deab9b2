//! Digest backends.
//!
//! The chain needs exactly one cryptographic capability: a 256-bit digest
//! over a byte payload, hex-encoded lowercase. That capability is injected
//! into [`crate::log::AuditChainLog`] at construction as a `DigestBackend`,
//! selected once by [`select_backend`], never probed per call.

use sha2::{Digest, Sha256};

use quaestor_contracts::error::{AuditError, AuditResult};

/// A 256-bit digest capability.
///
/// Implementations must be deterministic: the same payload always produces
/// the same hex string. The chain invariant depends on it.
pub trait DigestBackend: Send + Sync {
    /// Stable name of this backend, for logs and error messages.
    fn name(&self) -> &'static str;

    /// Hash `payload` and return the lowercase 64-character hex digest.
    fn digest_hex(&self, payload: &[u8]) -> AuditResult<String>;
}

/// SHA-256 via the pure-Rust `sha2` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Backend;

impl DigestBackend for Sha256Backend {
    fn name(&self) -> &'static str {
        "sha2"
    }

    fn digest_hex(&self, payload: &[u8]) -> AuditResult<String> {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Select the first available digest backend.
///
/// Returns `DigestUnavailable` when the provider list is empty. `sha2` is
/// compiled into this crate, so the error is unreachable today; builds that
/// swap the provider list keep the same failure contract.
pub fn select_backend() -> AuditResult<Box<dyn DigestBackend>> {
    let providers: Vec<Box<dyn DigestBackend>> = vec![Box::new(Sha256Backend)];

    providers
        .into_iter()
        .next()
        .ok_or_else(|| AuditError::DigestUnavailable {
            reason: "no digest backend compiled into this build".to_string(),
        })
}
