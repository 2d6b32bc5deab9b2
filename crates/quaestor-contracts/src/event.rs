//! Audit event types: the caller-supplied input and the chained record.
//!
//! `AuditEventInput` is what a route handler in the admin console supplies
//! when a privileged action happens. `AuditEvent` is the immutable record the
//! chain produces from it: the same fields plus the timestamp and the two
//! hashes that link it into the chain. Modifying any field of a stored event
//! invalidates `hash` and every subsequent `previous_hash`, which
//! `verify_chain` detects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of administrative roles that can appear in an audit record.
///
/// Serialized in snake_case: `system_admin`, `compliance_officer`,
/// `ai_manager`, `ops_analyst`, `support_agent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Full platform administration.
    SystemAdmin,
    /// Compliance and audit-trail review.
    ComplianceOfficer,
    /// Oversight of ML pricing and forecasting systems.
    AiManager,
    /// Operational analytics and dashboards.
    OpsAnalyst,
    /// Customer and vendor support.
    SupportAgent,
}

/// Caller-supplied facts about one administrative action.
///
/// Required fields are enforced by the type system; no further format
/// validation is applied. The hashing step treats every field as opaque
/// content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEventInput {
    /// Identifier of the principal performing the action.
    pub actor_id: String,

    /// The principal's role at the time of the action.
    pub actor_role: ActorRole,

    /// Short-code description of what happened (e.g. `"vendor.suspend"`).
    pub action: String,

    /// Identifier of the object acted upon (e.g. `"vendor_42"`).
    pub resource: String,

    /// Human-readable identity, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_email: Option<String>,

    /// Arbitrary event-specific detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A single chained audit record.
///
/// Carries every `AuditEventInput` field verbatim, plus the build timestamp
/// and the hash linkage. Callers persist or transmit these to whatever
/// durable audit store exists outside this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Identifier of the principal performing the action.
    pub actor_id: String,

    /// The principal's role at the time of the action.
    pub actor_role: ActorRole,

    /// Short-code description of what happened.
    pub action: String,

    /// Identifier of the object acted upon.
    pub resource: String,

    /// Human-readable identity, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_email: Option<String>,

    /// Arbitrary event-specific detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// Wall-clock time (UTC) the event was built, microsecond precision.
    pub timestamp: DateTime<Utc>,

    /// The chain tip at build time: the previous event's `hash`, or
    /// `GENESIS_HASH` (or a reset seed) for the first event of a segment.
    pub previous_hash: String,

    /// SHA-256 (hex, lowercase) of this event's canonical payload.
    pub hash: String,
}

impl AuditEvent {
    /// The sentinel `previous_hash` used for the first event in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
