// crates/rowguard-core/src/runtime/context.rs
// ============================================================================
// Module: Rowguard Request Context Store
// Description: Ambient, per-logical-request storage for principal and tenant.
// Purpose: Carry authorization data to persistence hooks without parameter threading.
// Dependencies: crate::core, serde_json, tokio
// ============================================================================

//! ## Overview
//! The request context store gives every layer of a request's call graph
//! access to the authenticated principal and derived tenant identifier
//! without threading them through each signature. Storage is task-local:
//! [`scope`] binds a fresh context to the logical task's causal chain of
//! continuations, so suspension and resumption across I/O boundaries keep
//! the same context, and concurrent requests can never observe each other's.
//!
//! ## Invariants
//! - At most one context is active per logical task; nested scopes shadow
//!   the outer one for their duration.
//! - Accessors outside any scope return `None` or no-op; background jobs
//!   legitimately run without a context and must not fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;

use serde_json::Value;

use crate::core::Principal;
use crate::core::TenantId;

// ============================================================================
// SECTION: Scope Storage
// ============================================================================

/// Per-request ambient storage bound to one logical task.
///
/// # Invariants
/// - Owned exclusively by the task that created it; the interior mutability
///   is never observable across tasks.
#[derive(Debug, Default)]
pub struct RequestScope {
    /// Authenticated principal, populated after authentication succeeds.
    principal: RefCell<Option<Principal>>,
    /// Tenant identifier derived from the principal.
    tenant: RefCell<Option<TenantId>>,
    /// Free-form values keyed by name.
    values: RefCell<BTreeMap<String, Value>>,
}

impl RequestScope {
    /// Builds an empty scope.
    #[must_use]
    fn new() -> Self {
        Self::default()
    }
}

tokio::task_local! {
    /// Active request scope for the current logical task.
    static REQUEST_SCOPE: RequestScope;
}

// ============================================================================
// SECTION: Scope Establishment
// ============================================================================

/// Runs `work` inside a fresh, empty request scope.
///
/// Every continuation spawned from `work` on the same logical task observes
/// this scope, including ones resuming after I/O. Concurrent invocations
/// are fully isolated from each other. Returns whatever `work` produces.
pub async fn scope<F>(work: F) -> F::Output
where
    F: Future,
{
    REQUEST_SCOPE.scope(RequestScope::new(), work).await
}

/// Runs synchronous `work` inside a fresh request scope.
///
/// Useful for non-async entry points such as startup hooks and tests.
pub fn sync_scope<T>(work: impl FnOnce() -> T) -> T {
    REQUEST_SCOPE.sync_scope(RequestScope::new(), work)
}

/// Returns true when a request scope is active on this task.
#[must_use]
pub fn in_scope() -> bool {
    REQUEST_SCOPE.try_with(|_| ()).is_ok()
}

// ============================================================================
// SECTION: Typed Accessors
// ============================================================================

/// Stores the authenticated principal in the active scope.
///
/// No-op outside a scope.
pub fn set_principal(principal: Principal) {
    let _ = REQUEST_SCOPE.try_with(|scope| {
        *scope.principal.borrow_mut() = Some(principal);
    });
}

/// Returns the authenticated principal from the active scope, if any.
#[must_use]
pub fn current_principal() -> Option<Principal> {
    REQUEST_SCOPE.try_with(|scope| scope.principal.borrow().clone()).ok().flatten()
}

/// Stores the tenant identifier in the active scope.
///
/// No-op outside a scope.
pub fn set_tenant(tenant_id: TenantId) {
    let _ = REQUEST_SCOPE.try_with(|scope| {
        *scope.tenant.borrow_mut() = Some(tenant_id);
    });
}

/// Returns the tenant identifier from the active scope, if any.
#[must_use]
pub fn current_tenant() -> Option<TenantId> {
    REQUEST_SCOPE.try_with(|scope| scope.tenant.borrow().clone()).ok().flatten()
}

// ============================================================================
// SECTION: Generic Accessors
// ============================================================================

/// Stores a free-form value under `key` in the active scope.
///
/// No-op outside a scope.
pub fn set_value(key: impl Into<String>, value: Value) {
    let key = key.into();
    let _ = REQUEST_SCOPE.try_with(|scope| {
        scope.values.borrow_mut().insert(key, value);
    });
}

/// Returns the value stored under `key`, if any.
#[must_use]
pub fn value(key: &str) -> Option<Value> {
    REQUEST_SCOPE.try_with(|scope| scope.values.borrow().get(key).cloned()).ok().flatten()
}
