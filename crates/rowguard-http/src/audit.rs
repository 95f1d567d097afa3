// crates/rowguard-http/src/audit.rs
// ============================================================================
// Module: Access Audit Logging
// Description: Structured audit events for request authorization decisions.
// Purpose: Emit guard decisions as JSON lines without hard dependencies.
// Dependencies: rowguard-core, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for authorization
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rowguard_core::Action;
use rowguard_core::Principal;
use rowguard_core::ResourceType;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Guard decision audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AccessAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Resource type the request targeted.
    pub resource: String,
    /// Action the request attempted.
    pub action: &'static str,
    /// Whether access was allowed.
    pub allowed: bool,
    /// Principal identifier when a principal was attached.
    pub principal_id: Option<String>,
    /// Principal role label when a principal was attached.
    pub role: Option<&'static str>,
    /// Tenant identifier when a principal was attached.
    pub tenant_id: Option<String>,
    /// Whether an instance document participated in the decision.
    pub instance_checked: bool,
}

impl AccessAuditEvent {
    /// Creates a new guard decision event with a consistent timestamp.
    #[must_use]
    pub fn new(
        principal: Option<&Principal>,
        resource: &ResourceType,
        action: Action,
        allowed: bool,
        instance_checked: bool,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "guard_decision",
            timestamp_ms,
            resource: resource.as_str().to_owned(),
            action: action.as_str(),
            allowed,
            principal_id: principal.map(|p| p.id.as_str().to_owned()),
            role: principal.map(|p| p.role.as_str()),
            tenant_id: principal.map(|p| p.tenant_id.as_str().to_owned()),
            instance_checked,
        }
    }
}

/// Payload sanitization audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizeAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request method label.
    pub method: String,
    /// Field names removed from the payload.
    pub removed_fields: Vec<String>,
    /// Principal identifier when a principal was attached.
    pub principal_id: Option<String>,
    /// Principal role label when a principal was attached.
    pub role: Option<&'static str>,
}

impl SanitizeAuditEvent {
    /// Creates a new sanitization event with a consistent timestamp.
    #[must_use]
    pub fn new(principal: Option<&Principal>, method: &str, removed_fields: Vec<String>) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "payload_sanitized",
            timestamp_ms,
            method: method.to_owned(),
            removed_fields,
            principal_id: principal.map(|p| p.id.as_str().to_owned()),
            role: principal.map(|p| p.role.as_str()),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for request authorization events.
pub trait AccessAuditSink: Send + Sync {
    /// Record a guard decision event.
    fn record(&self, event: &AccessAuditEvent);

    /// Record a payload sanitization event.
    fn record_sanitize(&self, _event: &SanitizeAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAccessAuditSink;

impl AccessAuditSink for StderrAccessAuditSink {
    fn record(&self, event: &AccessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_sanitize(&self, event: &SanitizeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAccessAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAccessAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AccessAuditSink for FileAccessAuditSink {
    fn record(&self, event: &AccessAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }

    fn record_sanitize(&self, event: &SanitizeAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAccessAuditSink;

impl AccessAuditSink for NoopAccessAuditSink {
    fn record(&self, _event: &AccessAuditEvent) {}

    fn record_sanitize(&self, _event: &SanitizeAuditEvent) {}
}
