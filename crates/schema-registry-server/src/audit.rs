// crates/schema-registry-server/src/audit.rs
// ============================================================================
// Module: Request Audit
// Description: Structured audit events for registry API operations.
// Purpose: Record one JSON event per request without hard logging deps.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every API operation records one audit event carrying the operation label,
//! the requested scope, the version when known, and the outcome. Error kinds
//! are normalized labels; in particular, a metadata row whose backing file is
//! absent is only distinguishable here, via the `desync` kind, while the HTTP
//! response stays a generic internal error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Registry API operation labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Schema upload.
    Upload,
    /// Latest-version fetch.
    GetLatest,
    /// Version listing.
    ListVersions,
    /// Exact-version fetch.
    GetVersion,
}

impl Operation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::GetLatest => "get_latest",
            Self::ListVersions => "list_versions",
            Self::GetVersion => "get_version",
        }
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// One audit event per handled request.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Operation label.
    pub operation: Operation,
    /// Requested application name, as supplied by the client.
    pub application: String,
    /// Requested service name, as supplied by the client.
    pub service: String,
    /// Version involved, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Request outcome: `ok` or `error`.
    pub outcome: &'static str,
    /// Normalized error kind when the request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: &AuditEvent);
}

/// Audit sink writing one JSON event per line to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "Stderr is the audit destination.")]
    fn record(&self, event: &AuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}
