//! The `AuditChainLog` service: builds chain-linked records from
//! administrative action descriptions.
//!
//! One instance owns one chain. The digest backend and diagnostic sink are
//! injected at construction; the chain tip lives behind a `Mutex` whose guard
//! spans the full read-tip → hash → write-tip sequence, so concurrent callers
//! serialize and can never both build against the same predecessor.

use std::sync::{Arc, Mutex};

use quaestor_contracts::{
    error::{AuditError, AuditResult},
    event::{AuditEvent, AuditEventInput},
};

use crate::{
    canonical::now_micros,
    chain::{hash_event, ChainState},
    digest::DigestBackend,
    sink::DiagnosticSink,
};

/// Builds and links tamper-evident audit records for one chain.
///
/// The log holds no event history; callers persist the returned records to
/// whatever durable audit store exists outside this subsystem. What the log
/// owns is the chain tip, which threads successive calls together.
///
/// # Thread safety
///
/// `build_event` and `record_event` acquire the tip lock for the whole
/// read-compute-write sequence. Multiple threads may share one log through
/// `Arc` without additional synchronization.
pub struct AuditChainLog {
    digest: Box<dyn DigestBackend>,
    sink: Box<dyn DiagnosticSink>,
    state: Arc<Mutex<ChainState>>,
}

impl AuditChainLog {
    /// Create a log whose first event will link to `AuditEvent::GENESIS_HASH`.
    pub fn new(digest: Box<dyn DigestBackend>, sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            digest,
            sink,
            state: Arc::new(Mutex::new(ChainState::genesis())),
        }
    }

    /// Create a log continuing a chain segment from an externally persisted
    /// tip.
    pub fn with_seed(
        digest: Box<dyn DigestBackend>,
        sink: Box<dyn DiagnosticSink>,
        seed: impl Into<String>,
    ) -> Self {
        Self {
            digest,
            sink,
            state: Arc::new(Mutex::new(ChainState::seeded(seed))),
        }
    }

    /// Build one chain-linked audit record.
    ///
    /// Captures the current UTC instant (microsecond precision), reads the
    /// tip as `previous_hash`, hashes the canonical payload, and advances the
    /// tip to the new hash, all under one lock guard. The tip advances only
    /// after the digest succeeds: a failed call returns no partial event and
    /// leaves the tip exactly where it was.
    ///
    /// The input is never mutated; its fields are carried into the returned
    /// event verbatim.
    ///
    /// # Errors
    ///
    /// `DigestFailed` / `DigestUnavailable` when the backend cannot hash the
    /// payload, `ChainStateCorrupt` when the tip lock is poisoned,
    /// `CanonicalizationFailed` when the payload cannot be serialized.
    pub fn build_event(&self, input: &AuditEventInput) -> AuditResult<AuditEvent> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| AuditError::ChainStateCorrupt {
                reason: format!("chain tip lock poisoned: {e}"),
            })?;

        let timestamp = now_micros();
        let previous_hash = state.tip().to_string();

        let hash = hash_event(self.digest.as_ref(), input, &timestamp, &previous_hash)?;

        let event = AuditEvent {
            actor_id: input.actor_id.clone(),
            actor_role: input.actor_role,
            action: input.action.clone(),
            resource: input.resource.clone(),
            actor_email: input.actor_email.clone(),
            metadata: input.metadata.clone(),
            timestamp,
            previous_hash,
            hash: hash.clone(),
        };

        state.advance(hash);

        Ok(event)
    }

    /// Build one record, then emit it to the diagnostic sink.
    ///
    /// The emission is best-effort and not part of the audit guarantee; it
    /// cannot fail the call or alter the returned record.
    pub fn record_event(&self, input: &AuditEventInput) -> AuditResult<AuditEvent> {
        let event = self.build_event(input)?;
        self.sink.emit(&event);
        Ok(event)
    }

    /// Reset the chain tip to `seed`, or to `AuditEvent::GENESIS_HASH` when
    /// absent. Always succeeds.
    ///
    /// Starts a fresh chain segment: per test case, or at process boot when
    /// chain continuity is persisted externally and re-seeded on startup.
    pub fn reset_chain(&self, seed: Option<&str>) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.reset(seed);
    }

    /// The current chain tip: the next event's `previous_hash`.
    pub fn tip(&self) -> String {
        let state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.tip().to_string()
    }

    /// Name of the digest backend this log was constructed with.
    pub fn digest_name(&self) -> &'static str {
        self.digest.name()
    }
}
