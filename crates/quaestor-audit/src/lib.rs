//! # quaestor-audit
//!
//! Tamper-evident, SHA-256 hash-chained audit log for administrative actions
//! on the QUAESTOR commerce platform.
//!
//! ## Overview
//!
//! Every privileged admin action is wrapped in an `AuditEvent` that links to
//! the previous event via its SHA-256 hash.  Tampering with any stored event
//! — even a single byte — breaks the chain and is detected by `verify_chain`.
//! The log holds only the chain tip; callers persist the returned records.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quaestor_audit::{select_backend, AuditChainLog, TracingSink};
//! use quaestor_contracts::{ActorRole, AuditEventInput};
//!
//! let log = AuditChainLog::new(select_backend()?, Box::new(TracingSink));
//! let event = log.record_event(&AuditEventInput {
//!     actor_id: "u-100".into(),
//!     actor_role: ActorRole::SystemAdmin,
//!     action: "vendor.suspend".into(),
//!     resource: "vendor_42".into(),
//!     actor_email: None,
//!     metadata: None,
//! })?;
//! // persist `event`; event.previous_hash links it to the chain
//! ```

mod canonical;
pub mod chain;
pub mod digest;
pub mod log;
pub mod sink;

pub use chain::{hash_event, rehash_event, verify_chain, ChainState};
pub use digest::{select_backend, DigestBackend, Sha256Backend};
pub use log::AuditChainLog;
pub use sink::{DiagnosticSink, NoopSink, TracingSink};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::thread;

    use chrono::{DateTime, Utc};
    use serde_json::json;

    use quaestor_contracts::{
        error::{AuditError, AuditResult},
        event::{ActorRole, AuditEvent, AuditEventInput},
    };

    use super::{
        rehash_event, verify_chain, AuditChainLog, DiagnosticSink, DigestBackend, NoopSink,
        Sha256Backend,
    };

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn input(actor_id: &str, role: ActorRole, action: &str, resource: &str) -> AuditEventInput {
        AuditEventInput {
            actor_id: actor_id.to_string(),
            actor_role: role,
            action: action.to_string(),
            resource: resource.to_string(),
            actor_email: None,
            metadata: None,
        }
    }

    fn new_log() -> AuditChainLog {
        AuditChainLog::new(Box::new(Sha256Backend), Box::new(NoopSink))
    }

    /// A backend that refuses every payload, for exercising failure paths.
    struct FailingBackend;

    impl DigestBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn digest_hex(&self, _payload: &[u8]) -> AuditResult<String> {
            Err(AuditError::DigestFailed {
                reason: "backend offline".to_string(),
            })
        }
    }

    /// A sink that remembers the hash of every event it sees.
    struct CapturingSink {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl DiagnosticSink for CapturingSink {
        fn emit(&self, event: &AuditEvent) {
            self.seen.lock().unwrap().push(event.hash.clone());
        }
    }

    // ── Chain linkage ─────────────────────────────────────────────────────────

    /// Three sequential builds produce a genesis-anchored linked chain.
    #[test]
    fn test_chain_linkage() {
        let log = new_log();

        let e1 = log
            .build_event(&input("u1", ActorRole::SystemAdmin, "vendor.suspend", "vendor_42"))
            .unwrap();
        let e2 = log
            .build_event(&input("u2", ActorRole::ComplianceOfficer, "vendor.reinstate", "vendor_42"))
            .unwrap();
        let e3 = log
            .build_event(&input("u3", ActorRole::OpsAnalyst, "report.export", "report_7"))
            .unwrap();

        assert_eq!(e1.previous_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(e2.previous_hash, e1.hash);
        assert_eq!(e3.previous_hash, e2.hash);
        assert_eq!(log.tip(), e3.hash);
    }

    /// The hash is a 64-character lowercase hex string.
    #[test]
    fn test_hash_format() {
        let log = new_log();
        let event = log
            .build_event(&input("u1", ActorRole::SystemAdmin, "vendor.suspend", "vendor_42"))
            .unwrap();

        assert_eq!(event.hash.len(), 64);
        assert!(event.hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    // ── Determinism ───────────────────────────────────────────────────────────

    /// Recomputing a stored event's hash from its own fields reproduces it.
    #[test]
    fn test_rehash_reproduces_hash() {
        let log = new_log();
        let event = log
            .build_event(&AuditEventInput {
                actor_email: Some("admin@example.com".to_string()),
                metadata: Some(json!({ "reason": "chargeback fraud" })),
                ..input("u1", ActorRole::SystemAdmin, "vendor.suspend", "vendor_42")
            })
            .unwrap();

        let recomputed = rehash_event(&Sha256Backend, &event).unwrap();
        assert_eq!(recomputed, event.hash);
    }

    /// `hash_event` is a pure function of (input, timestamp, previous_hash).
    #[test]
    fn test_hash_event_deterministic() {
        let action = input("u9", ActorRole::AiManager, "pricing.override", "sku_9913");
        let ts: DateTime<Utc> = "2026-08-06T12:00:00.000001Z".parse().unwrap();

        let a = super::hash_event(&Sha256Backend, &action, &ts, AuditEvent::GENESIS_HASH).unwrap();
        let b = super::hash_event(&Sha256Backend, &action, &ts, AuditEvent::GENESIS_HASH).unwrap();
        assert_eq!(a, b);

        // Any change to the predecessor changes the hash.
        let c = super::hash_event(&Sha256Backend, &action, &ts, &"ab".repeat(32)).unwrap();
        assert_ne!(a, c);
    }

    // ── Verification ──────────────────────────────────────────────────────────

    /// An honestly built chain passes verification.
    #[test]
    fn test_verify_chain_accepts_honest_chain() {
        let log = new_log();
        let events: Vec<AuditEvent> = (0..4)
            .map(|i| {
                log.build_event(&input(
                    &format!("u{i}"),
                    ActorRole::SupportAgent,
                    "order.refund",
                    &format!("order_{i}"),
                ))
                .unwrap()
            })
            .collect();

        assert!(verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &events));
    }

    /// Mutating any stored field breaks verification.
    #[test]
    fn test_tamper_detection() {
        let log = new_log();
        let mut events: Vec<AuditEvent> = (0..3)
            .map(|i| {
                log.build_event(&input(
                    &format!("u{i}"),
                    ActorRole::SystemAdmin,
                    "vendor.suspend",
                    &format!("vendor_{i}"),
                ))
                .unwrap()
            })
            .collect();

        events[0].action = "vendor.reinstate".to_string();

        assert!(!verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &events));
    }

    /// Re-linking a tampered event without recomputing hashes still fails:
    /// the forged prev_hash breaks rule 1 on the next event.
    #[test]
    fn test_tampered_linkage_detected() {
        let log = new_log();
        let mut events: Vec<AuditEvent> = (0..3)
            .map(|i| {
                log.build_event(&input(
                    &format!("u{i}"),
                    ActorRole::ComplianceOfficer,
                    "kyc.approve",
                    &format!("vendor_{i}"),
                ))
                .unwrap()
            })
            .collect();

        events[1].previous_hash = "ff".repeat(32);

        assert!(!verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &events));
    }

    /// An empty segment is trivially valid.
    #[test]
    fn test_verify_empty() {
        assert!(verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &[]));
    }

    /// A chain verified against the wrong seed fails on the first event.
    #[test]
    fn test_verify_wrong_seed() {
        let log = new_log();
        let events =
            vec![log.build_event(&input("u1", ActorRole::OpsAnalyst, "report.export", "r1")).unwrap()];

        assert!(!verify_chain(&Sha256Backend, &"ab".repeat(32), &events));
    }

    // ── Reset ─────────────────────────────────────────────────────────────────

    /// An unseeded reset anchors the next event back to genesis.
    #[test]
    fn test_reset_to_genesis() {
        let log = new_log();
        log.build_event(&input("u1", ActorRole::SystemAdmin, "vendor.suspend", "vendor_1"))
            .unwrap();

        log.reset_chain(None);

        let event = log
            .build_event(&input("u2", ActorRole::SystemAdmin, "vendor.suspend", "vendor_2"))
            .unwrap();
        assert_eq!(event.previous_hash, AuditEvent::GENESIS_HASH);
    }

    /// A seeded reset makes the next event link to the seed exactly.
    #[test]
    fn test_reset_to_seed() {
        let log = new_log();
        let seed = "ab".repeat(32);

        log.reset_chain(Some(&seed));

        let event = log
            .build_event(&input("u1", ActorRole::AiManager, "model.retrain", "forecaster_v3"))
            .unwrap();
        assert_eq!(event.previous_hash, seed);
    }

    /// `with_seed` behaves like a seeded reset at construction time.
    #[test]
    fn test_with_seed_constructor() {
        let seed = "cd".repeat(32);
        let log = AuditChainLog::with_seed(Box::new(Sha256Backend), Box::new(NoopSink), &seed);

        assert_eq!(log.tip(), seed);

        let event = log
            .build_event(&input("u1", ActorRole::SupportAgent, "order.refund", "order_9"))
            .unwrap();
        assert_eq!(event.previous_hash, seed);
        assert!(verify_chain(&Sha256Backend, &seed, &[event]));
    }

    // ── Failure behavior ──────────────────────────────────────────────────────

    /// A failed digest leaves the tip exactly where it was.
    #[test]
    fn test_tip_not_advanced_on_digest_failure() {
        let seed = "ef".repeat(32);
        let log = AuditChainLog::with_seed(Box::new(FailingBackend), Box::new(NoopSink), &seed);

        let result = log.build_event(&input("u1", ActorRole::SystemAdmin, "vendor.suspend", "v1"));

        assert!(matches!(result, Err(AuditError::DigestFailed { .. })));
        assert_eq!(log.tip(), seed, "tip must not move on a failed build");
    }

    // ── Input handling ────────────────────────────────────────────────────────

    /// The returned event carries every input field verbatim, and the input
    /// itself is untouched.
    #[test]
    fn test_input_fields_verbatim() {
        let log = new_log();
        let original = AuditEventInput {
            actor_email: Some("co@example.com".to_string()),
            metadata: Some(json!({ "case": "CASE-881", "severity": 2 })),
            ..input("u-214", ActorRole::ComplianceOfficer, "vendor.reinstate", "vendor_42")
        };
        let before = original.clone();

        let event = log.build_event(&original).unwrap();

        assert_eq!(original, before, "build_event must not mutate its input");
        assert_eq!(event.actor_id, original.actor_id);
        assert_eq!(event.actor_role, original.actor_role);
        assert_eq!(event.action, original.action);
        assert_eq!(event.resource, original.resource);
        assert_eq!(event.actor_email, original.actor_email);
        assert_eq!(event.metadata, original.metadata);
    }

    /// Timestamps are microsecond-truncated and survive a serde round trip
    /// with the hash still verifiable.
    #[test]
    fn test_timestamp_round_trip() {
        let log = new_log();
        let event = log
            .build_event(&input("u1", ActorRole::OpsAnalyst, "report.export", "report_7"))
            .unwrap();

        assert_eq!(event.timestamp.timestamp_subsec_nanos() % 1_000, 0);

        let json = serde_json::to_string(&event).unwrap();
        let decoded: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.timestamp, event.timestamp);
        assert_eq!(rehash_event(&Sha256Backend, &decoded).unwrap(), decoded.hash);
    }

    // ── record_event ──────────────────────────────────────────────────────────

    /// `record_event` returns the same event it built and the sink sees it.
    #[test]
    fn test_record_event_emits_to_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = AuditChainLog::new(
            Box::new(Sha256Backend),
            Box::new(CapturingSink { seen: seen.clone() }),
        );

        let event = log
            .record_event(&input("u1", ActorRole::SupportAgent, "order.refund", "order_7741"))
            .unwrap();

        assert_eq!(log.tip(), event.hash);
        assert_eq!(*seen.lock().unwrap(), vec![event.hash.clone()]);
    }

    // ── Independent chains ────────────────────────────────────────────────────

    /// Two logs are fully independent: interleaved builds never cross-link.
    #[test]
    fn test_independent_chains() {
        let tenant_a = new_log();
        let tenant_b = new_log();

        let a1 = tenant_a
            .build_event(&input("u1", ActorRole::SystemAdmin, "vendor.suspend", "vendor_1"))
            .unwrap();
        let b1 = tenant_b
            .build_event(&input("u2", ActorRole::SystemAdmin, "vendor.suspend", "vendor_2"))
            .unwrap();
        let a2 = tenant_a
            .build_event(&input("u1", ActorRole::SystemAdmin, "vendor.reinstate", "vendor_1"))
            .unwrap();

        assert_eq!(a1.previous_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(b1.previous_hash, AuditEvent::GENESIS_HASH);
        assert_eq!(a2.previous_hash, a1.hash);
        assert_ne!(a1.hash, b1.hash);
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    /// Concurrent builders on one shared log produce a single linear chain:
    /// no two events claim the same predecessor.
    #[test]
    fn test_concurrent_builds_form_single_chain() {
        let log = Arc::new(new_log());
        let mut handles = Vec::new();

        for t in 0..4 {
            let log = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                (0..8)
                    .map(|i| {
                        log.build_event(&input(
                            &format!("u{t}"),
                            ActorRole::OpsAnalyst,
                            "report.export",
                            &format!("report_{t}_{i}"),
                        ))
                        .unwrap()
                    })
                    .collect::<Vec<AuditEvent>>()
            }));
        }

        let events: Vec<AuditEvent> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(events.len(), 32);

        // Every predecessor is claimed exactly once, and exactly one event
        // is anchored at genesis.
        let by_prev: HashMap<&str, &AuditEvent> = events
            .iter()
            .map(|e| (e.previous_hash.as_str(), e))
            .collect();
        assert_eq!(by_prev.len(), events.len(), "two events share a predecessor");
        assert_eq!(
            events
                .iter()
                .filter(|e| e.previous_hash == AuditEvent::GENESIS_HASH)
                .count(),
            1
        );

        // Walking from genesis reaches every event and the result verifies.
        let mut ordered = Vec::with_capacity(events.len());
        let mut cursor = AuditEvent::GENESIS_HASH.to_string();
        while let Some(event) = by_prev.get(cursor.as_str()) {
            ordered.push((*event).clone());
            cursor = event.hash.clone();
        }
        assert_eq!(ordered.len(), events.len());
        assert!(verify_chain(&Sha256Backend, AuditEvent::GENESIS_HASH, &ordered));
        assert_eq!(log.tip(), cursor);
    }

    // ── Backend selection ─────────────────────────────────────────────────────

    #[test]
    fn test_select_backend() {
        let backend = super::select_backend().unwrap();
        assert_eq!(backend.name(), "sha2");
    }
}
