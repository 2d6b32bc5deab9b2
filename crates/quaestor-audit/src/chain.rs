//! Chain state and hash-chain primitives: hashing and integrity verification.
//!
//! Every byte that contributes to an event's hash is listed explicitly so
//! nothing is accidentally omitted. This layout is load-bearing for hash
//! reproducibility and for cross-system verification of exported chains.
//!
//! Hash input layout (bytes, in order):
//!   1. previous_hash as UTF-8 bytes (64 ASCII hex chars)
//!   2. timestamp as RFC 3339 UTC, microsecond precision, `Z` suffix
//!   3. compact JSON of the input fields, keys in declaration order
//!      (actor_id, actor_role, action, resource, actor_email, metadata),
//!      absent optionals omitted entirely

use chrono::{DateTime, Utc};

use quaestor_contracts::{
    error::AuditResult,
    event::{AuditEvent, AuditEventInput},
};

use crate::{
    canonical::{canonical_payload, CanonicalFields},
    digest::DigestBackend,
};

// ── Chain state ───────────────────────────────────────────────────────────────

/// The explicitly owned chain tip: the hash the next event will reference as
/// its `previous_hash`.
///
/// One `ChainState` per independent chain. Keeping the tip in a value rather
/// than process-global state lets chains coexist (per tenant, per test)
/// without collision; `AuditChainLog` holds it behind a lock so the
/// read-compute-write sequence cannot interleave.
#[derive(Debug, Clone)]
pub struct ChainState {
    tip: String,
}

impl ChainState {
    /// A fresh chain whose first event will link to `GENESIS_HASH`.
    pub fn genesis() -> Self {
        Self {
            tip: AuditEvent::GENESIS_HASH.to_string(),
        }
    }

    /// A chain segment continuing from an externally persisted tip.
    pub fn seeded(seed: impl Into<String>) -> Self {
        Self { tip: seed.into() }
    }

    /// The current tip.
    pub fn tip(&self) -> &str {
        &self.tip
    }

    /// Advance the tip to a newly built event's hash.
    pub(crate) fn advance(&mut self, hash: String) {
        self.tip = hash;
    }

    /// Reset the tip to `seed`, or to `GENESIS_HASH` when absent.
    pub(crate) fn reset(&mut self, seed: Option<&str>) {
        self.tip = seed.unwrap_or(AuditEvent::GENESIS_HASH).to_string();
    }
}

impl Default for ChainState {
    fn default() -> Self {
        Self::genesis()
    }
}

// ── Hashing ───────────────────────────────────────────────────────────────────

/// Compute the hash a new event built from `input` at `timestamp` on top of
/// `previous_hash` will carry.
///
/// Pure function of its arguments under the given backend: identical inputs
/// reproduce the identical hex string.
pub fn hash_event(
    digest: &dyn DigestBackend,
    input: &AuditEventInput,
    timestamp: &DateTime<Utc>,
    previous_hash: &str,
) -> AuditResult<String> {
    let payload = canonical_payload(&CanonicalFields::from(input), timestamp, previous_hash)?;
    digest.digest_hex(&payload)
}

/// Recompute a stored event's hash from its own fields.
///
/// Used by `verify_chain`; exposed so external audit tooling can spot-check
/// single records without walking a whole chain.
pub fn rehash_event(digest: &dyn DigestBackend, event: &AuditEvent) -> AuditResult<String> {
    let payload = canonical_payload(
        &CanonicalFields::from(event),
        &event.timestamp,
        &event.previous_hash,
    )?;
    digest.digest_hex(&payload)
}

// ── Verification ──────────────────────────────────────────────────────────────

/// Verify the integrity of a chain segment.
///
/// Returns `true` when the segment is valid according to both rules:
///
/// 1. **Linkage** — each event's `previous_hash` equals the `hash` of the
///    preceding event, and the first event links to `seed` (usually
///    `AuditEvent::GENESIS_HASH`).
/// 2. **Correctness** — each event's `hash` matches the value recomputed
///    from its own fields.
///
/// Returns `false` the moment any mismatch is detected; a digest failure
/// during recomputation also counts as a verification failure. An empty
/// segment is defined as valid.
pub fn verify_chain(digest: &dyn DigestBackend, seed: &str, events: &[AuditEvent]) -> bool {
    let mut expected_prev = seed;

    for event in events {
        if event.previous_hash != expected_prev {
            return false;
        }

        match rehash_event(digest, event) {
            Ok(recomputed) if recomputed == event.hash => {}
            _ => return false,
        }

        expected_prev = &event.hash;
    }

    true
}
