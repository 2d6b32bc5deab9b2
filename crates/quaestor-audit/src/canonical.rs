//! Canonical payload construction.
//!
//! One serialization, applied identically on the build path and the verify
//! path. The authoritative byte layout is documented in [`crate::chain`];
//! this module owns the two pieces that make it reproducible: the borrowed
//! field view shared by both paths, and the microsecond-precision timestamp
//! contract.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::Serialize;

use quaestor_contracts::{
    error::{AuditError, AuditResult},
    event::{ActorRole, AuditEvent, AuditEventInput},
};

/// Borrowed view of the fields that enter the digest.
///
/// Built from an `AuditEventInput` when hashing a new event and from a stored
/// `AuditEvent` when re-hashing during verification, so the two paths cannot
/// drift apart. Key order is declaration order; `None` optionals are omitted.
#[derive(Serialize)]
pub(crate) struct CanonicalFields<'a> {
    actor_id: &'a str,
    actor_role: ActorRole,
    action: &'a str,
    resource: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    actor_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a serde_json::Value>,
}

impl<'a> From<&'a AuditEventInput> for CanonicalFields<'a> {
    fn from(input: &'a AuditEventInput) -> Self {
        Self {
            actor_id: &input.actor_id,
            actor_role: input.actor_role,
            action: &input.action,
            resource: &input.resource,
            actor_email: input.actor_email.as_deref(),
            metadata: input.metadata.as_ref(),
        }
    }
}

impl<'a> From<&'a AuditEvent> for CanonicalFields<'a> {
    fn from(event: &'a AuditEvent) -> Self {
        Self {
            actor_id: &event.actor_id,
            actor_role: event.actor_role,
            action: &event.action,
            resource: &event.resource,
            actor_email: event.actor_email.as_deref(),
            metadata: event.metadata.as_ref(),
        }
    }
}

/// Current UTC instant, truncated to microsecond precision.
///
/// Sub-microsecond digits are dropped at capture so the stored timestamp
/// reserializes to the identical RFC 3339 string during verification.
pub(crate) fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000).unwrap_or(now)
}

/// Render a timestamp exactly as it is hashed: RFC 3339 UTC, six fractional
/// digits, `Z` suffix.
pub(crate) fn timestamp_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Assemble the canonical byte payload for one event.
pub(crate) fn canonical_payload(
    fields: &CanonicalFields<'_>,
    timestamp: &DateTime<Utc>,
    previous_hash: &str,
) -> AuditResult<Vec<u8>> {
    let fields_json =
        serde_json::to_vec(fields).map_err(|e| AuditError::CanonicalizationFailed {
            reason: e.to_string(),
        })?;

    let timestamp_bytes = timestamp_string(timestamp).into_bytes();

    let mut payload =
        Vec::with_capacity(previous_hash.len() + timestamp_bytes.len() + fields_json.len());
    payload.extend_from_slice(previous_hash.as_bytes());
    payload.extend_from_slice(&timestamp_bytes);
    payload.extend_from_slice(&fields_json);
    Ok(payload)
}
