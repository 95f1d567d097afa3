// crates/rowguard-http/src/context.rs
// ============================================================================
// Module: Request Context Middleware
// Description: Ambient per-request context establishment for axum routers.
// Purpose: Open a context scope per request and attach the principal to it.
// Dependencies: axum, rowguard-core
// ============================================================================

//! ## Overview
//! This module wires the ambient request context into the axum middleware
//! chain. [`context_scope`] opens a fresh scope around the rest of the
//! request pipeline so handlers and downstream middleware share one isolated
//! context. [`attach_principal`] copies the authenticated principal from
//! request extensions into that scope, making tenant narrowing and policy
//! checks ambient for the remainder of the request.
//!
//! Layer ordering matters: `context_scope` must wrap `attach_principal`,
//! which must wrap any guard or sanitization middleware. With axum's
//! outside-in layering that means `context_scope` is applied last.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use rowguard_core::Principal;
use rowguard_core::context;

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Runs the remainder of the request pipeline inside a fresh context scope.
///
/// Every request gets its own scope. Values set during one request are
/// invisible to every other request, including concurrent ones, and the
/// scope is discarded when the response is produced.
pub async fn context_scope(request: Request, next: Next) -> Response {
    context::scope(next.run(request)).await
}

/// Copies the authenticated principal from request extensions into the
/// ambient context.
///
/// Authentication middleware is expected to insert a [`Principal`] extension
/// after verifying credentials. Requests without a principal extension pass
/// through untouched, leaving the context unauthenticated: downstream reads
/// operate in passthrough mode and guard checks deny.
pub async fn attach_principal(request: Request, next: Next) -> Response {
    if let Some(principal) = request.extensions().get::<Principal>().cloned() {
        context::set_tenant(principal.tenant_id.clone());
        context::set_principal(principal);
    }
    next.run(request).await
}
