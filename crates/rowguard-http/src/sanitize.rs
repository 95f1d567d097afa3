// crates/rowguard-http/src/sanitize.rs
// ============================================================================
// Module: Write Payload Sanitization
// Description: Field-level write guard for mutating request bodies.
// Purpose: Strip privileged fields from non-admin payloads and the tenant
//          field from every update, before handlers ever see the body.
// Dependencies: axum, rowguard-config, rowguard-core, serde_json
// ============================================================================

//! ## Overview
//! This module buffers the JSON body of mutating requests and removes fields
//! the caller is not entitled to set. Two rules apply:
//!
//! - Sensitive fields (role, permissions, MFA material, the tenant field
//!   itself) are removed unless the ambient principal is an admin.
//! - On `PUT` and `PATCH` the tenant field is removed for every role,
//!   admins included, so an update can never move a document between
//!   tenants.
//!
//! Non-JSON bodies pass through untouched. The middleware must be layered
//! behind [`crate::context::attach_principal`] so the admin check sees the
//! authenticated principal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rowguard_config::GuardConfig;
use rowguard_core::Role;
use rowguard_core::TENANT_FIELD;
use rowguard_core::context;
use serde_json::Value;

use crate::audit::AccessAuditSink;
use crate::audit::NoopAccessAuditSink;
use crate::audit::SanitizeAuditEvent;
use crate::guard::GuardFuture;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum mutating request body size accepted for sanitization (bytes).
pub const MAX_SANITIZE_BODY_BYTES: usize = 1_048_576;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Field-level write guard for request payloads.
///
/// # Invariants
///
/// - Sensitive-field stripping applies to every non-admin principal,
///   including requests with no principal at all.
/// - The tenant field is removed from `PUT`/`PATCH` payloads regardless of
///   role.
pub struct PayloadSanitizer {
    /// Field names removed from non-admin payloads.
    sensitive_fields: Vec<String>,
    /// Maximum body size accepted before rejecting the request.
    max_body_bytes: usize,
    /// Sink receiving one event per modified payload.
    audit: Arc<dyn AccessAuditSink>,
}

impl PayloadSanitizer {
    /// Creates a sanitizer from the guard configuration's sensitive fields.
    #[must_use]
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            sensitive_fields: config.sensitive_fields.clone(),
            max_body_bytes: MAX_SANITIZE_BODY_BYTES,
            audit: Arc::new(NoopAccessAuditSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AccessAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the maximum accepted body size.
    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Removes disallowed fields from a parsed payload in place.
    ///
    /// Returns the field names that were removed. Nested objects are left
    /// untouched: entitlement-bearing fields live at the top level of every
    /// document.
    pub fn apply(&self, payload: &mut Value, privileged: bool, method: &Method) -> Vec<String> {
        let Some(object) = payload.as_object_mut() else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        if !privileged {
            for field in &self.sensitive_fields {
                if object.remove(field).is_some() {
                    removed.push(field.clone());
                }
            }
        }
        if matches!(*method, Method::PUT | Method::PATCH)
            && object.remove(TENANT_FIELD).is_some()
            && !removed.iter().any(|f| f == TENANT_FIELD)
        {
            removed.push(TENANT_FIELD.to_owned());
        }
        removed
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Builds a middleware closure sanitizing mutating JSON request bodies.
///
/// Non-mutating methods and non-JSON bodies pass through unchanged. Bodies
/// larger than the configured limit are rejected with `413`.
pub fn sanitize_payload(
    sanitizer: Arc<PayloadSanitizer>,
) -> impl Fn(Request, Next) -> GuardFuture + Clone + Send + Sync + 'static {
    move |request: Request, next: Next| {
        let sanitizer = Arc::clone(&sanitizer);
        Box::pin(async move {
            if !matches!(*request.method(), Method::POST | Method::PUT | Method::PATCH) {
                return next.run(request).await;
            }
            let (mut parts, body) = request.into_parts();
            let Ok(bytes) = axum::body::to_bytes(body, sanitizer.max_body_bytes).await else {
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            };
            let bytes = match serde_json::from_slice::<Value>(&bytes) {
                Ok(mut payload) => {
                    let principal = context::current_principal();
                    let privileged =
                        principal.as_ref().is_some_and(|p| matches!(p.role, Role::Admin));
                    let removed = sanitizer.apply(&mut payload, privileged, &parts.method);
                    if removed.is_empty() {
                        bytes
                    } else {
                        sanitizer.audit.record_sanitize(&SanitizeAuditEvent::new(
                            principal.as_ref(),
                            parts.method.as_str(),
                            removed,
                        ));
                        match serde_json::to_vec(&payload) {
                            Ok(rewritten) => rewritten.into(),
                            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
                        }
                    }
                }
                Err(_) => bytes,
            };
            parts.headers.remove(CONTENT_LENGTH);
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        })
    }
}

#[cfg(test)]
mod tests;
