//! Diagnostic sinks for locally observing recorded events.
//!
//! The sink is a development convenience, not part of the audit guarantee:
//! emission is best-effort, infallible by signature, and cannot affect the
//! record returned to the caller. The composition root decides which sink a
//! log gets (`TracingSink` in development wiring, `NoopSink` in production)
//! instead of any ambient environment sensing at call time.

use tracing::info;

use quaestor_contracts::event::AuditEvent;

/// Best-effort local observer for recorded events.
pub trait DiagnosticSink: Send + Sync {
    /// Observe one freshly built event. Must not panic.
    fn emit(&self, event: &AuditEvent);
}

/// Emits a structured `tracing` event per record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: &AuditEvent) {
        info!(
            actor_id = %event.actor_id,
            actor_role = ?event.actor_role,
            action = %event.action,
            resource = %event.resource,
            hash = %event.hash,
            "audit event recorded"
        );
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn emit(&self, _event: &AuditEvent) {}
}
