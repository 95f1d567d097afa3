// crates/rowguard-http/src/guard.rs
// ============================================================================
// Module: Permission Guard Middleware
// Description: Route-level authorization checks backed by the policy engine.
// Purpose: Deny requests whose principal holds no grant for the route's
//          resource/action pair, with a uniform 403 response shape.
// Dependencies: axum, rowguard-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module turns policy engine decisions into HTTP semantics. A
//! [`PermissionGuard`] owns a compiled [`PolicyEngine`] and an audit sink;
//! [`require_permission`] wraps it into a middleware closure suitable for
//! `axum::middleware::from_fn`, one per route and resource/action pair.
//!
//! Denials never distinguish "no principal" from "no matching policy": both
//! produce the same 403 body, so probing responses leak nothing about which
//! policies exist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use rowguard_core::Action;
use rowguard_core::PolicyEngine;
use rowguard_core::ResourceType;
use rowguard_core::context;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::AccessAuditEvent;
use crate::audit::AccessAuditSink;
use crate::audit::NoopAccessAuditSink;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Authorization failure surfaced to HTTP clients.
#[derive(Debug, Clone, Error)]
pub enum GuardError {
    /// The principal holds no grant for the attempted resource/action pair.
    #[error("you do not have permission to {} this {}", .action.as_str(), .resource.as_str())]
    Forbidden {
        /// Action the request attempted.
        action: Action,
        /// Resource type the request targeted.
        resource: ResourceType,
    },
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.to_string(),
        });
        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}

/// Instance document attached to a request for instance-level policy checks.
///
/// Resource-loading middleware inserts this extension after fetching the
/// target document, so guards placed behind it can evaluate tenant-match
/// predicates against the concrete instance instead of the placeholder.
#[derive(Debug, Clone)]
pub struct LoadedResource(pub Value);

/// Route-level authorization guard.
///
/// # Invariants
///
/// - Decisions are delegated entirely to the policy engine; the guard adds
///   no grants of its own.
/// - A request without an ambient principal is always denied.
pub struct PermissionGuard {
    /// Compiled policy engine consulted for every decision.
    engine: Arc<PolicyEngine>,
    /// Sink receiving one event per decision.
    audit: Arc<dyn AccessAuditSink>,
}

impl PermissionGuard {
    /// Creates a guard with no audit output.
    #[must_use]
    pub fn new(engine: Arc<PolicyEngine>) -> Self {
        Self {
            engine,
            audit: Arc::new(NoopAccessAuditSink),
        }
    }

    /// Creates a guard that reports decisions to the supplied sink.
    #[must_use]
    pub fn with_audit(engine: Arc<PolicyEngine>, audit: Arc<dyn AccessAuditSink>) -> Self {
        Self {
            engine,
            audit,
        }
    }

    /// Checks the ambient principal against the policy engine.
    ///
    /// Passing an instance document enables instance-level predicates;
    /// omitting it evaluates predicates against the placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Forbidden`] when no principal is attached or no
    /// policy grants the pair.
    pub fn require(
        &self,
        resource: &ResourceType,
        action: Action,
        instance: Option<&Value>,
    ) -> Result<(), GuardError> {
        let principal = context::current_principal();
        let allowed = principal
            .as_ref()
            .is_some_and(|p| self.engine.check(p, resource, action, instance));
        self.audit.record(&AccessAuditEvent::new(
            principal.as_ref(),
            resource,
            action,
            allowed,
            instance.is_some(),
        ));
        if allowed {
            Ok(())
        } else {
            Err(GuardError::Forbidden {
                action,
                resource: resource.clone(),
            })
        }
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Boxed response future produced by guard middleware closures.
pub type GuardFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Builds a middleware closure denying requests without a matching grant.
///
/// The closure reads a [`LoadedResource`] extension when present and feeds
/// it to instance-level predicates, so it must be layered behind any
/// resource-loading middleware for routes that need instance checks.
pub fn require_permission(
    guard: Arc<PermissionGuard>,
    resource: ResourceType,
    action: Action,
) -> impl Fn(Request, Next) -> GuardFuture + Clone + Send + Sync + 'static {
    move |request: Request, next: Next| {
        let guard = Arc::clone(&guard);
        let resource = resource.clone();
        Box::pin(async move {
            let instance = request.extensions().get::<LoadedResource>().map(|r| r.0.clone());
            match guard.require(&resource, action, instance.as_ref()) {
                Ok(()) => next.run(request).await,
                Err(error) => error.into_response(),
            }
        })
    }
}
