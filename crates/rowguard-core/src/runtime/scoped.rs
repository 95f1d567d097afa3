// crates/rowguard-core/src/runtime/scoped.rs
// ============================================================================
// Module: Rowguard Tenant-Scoped Store
// Description: Row-level isolation decorator over any document store.
// Purpose: Narrow read/count/delete operations to the caller's tenant transparently.
// Dependencies: crate::{core, interfaces, runtime::context}, async-trait
// ============================================================================

//! ## Overview
//! [`TenantScopedStore`] wraps a [`DocumentStore`] and conjoins a tenant
//! equality clause onto every filtered operation issued while a request
//! context with a principal is active. The narrowing is evaluated fresh on
//! every call; there is no cached scope that could go stale.
//!
//! Point lookups are the one path a filter cannot protect, so
//! [`DocumentStore::find_by_id`] on this decorator performs the post-load
//! tenant comparison internally and converts a cross-tenant hit into
//! not-found. Callers never see that the row exists under another tenant.
//!
//! ## Invariants
//! - Bypass is an explicit per-call opt-in, audited, never a default.
//! - Without a principal in context the operation passes through; those
//!   paths (registration, login, background jobs) scope themselves.
//! - The reserved bypass role passes through with full visibility.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Document;
use crate::core::DocumentId;
use crate::core::Filter;
use crate::core::Principal;
use crate::core::TenantId;
use crate::interfaces::DocumentStore;
use crate::interfaces::IsolationAuditSink;
use crate::interfaces::IsolationEvent;
use crate::interfaces::NoopIsolationAuditSink;
use crate::interfaces::PassthroughReason;
use crate::interfaces::ReadOptions;
use crate::interfaces::StoreError;
use crate::runtime::context;

// ============================================================================
// SECTION: Narrowing Outcome
// ============================================================================

/// Result of evaluating the isolation algorithm for one operation.
enum Narrowing {
    /// Operation proceeds unmodified.
    Passthrough(PassthroughReason, Option<Principal>),
    /// Operation proceeds with the tenant clause conjoined.
    Scoped(TenantId),
    /// Context carries a principal but no tenant key; nothing to conjoin.
    Unscoped,
}

// ============================================================================
// SECTION: Tenant-Scoped Store
// ============================================================================

/// Row-level isolation decorator applied identically to every collection.
pub struct TenantScopedStore<S> {
    /// Wrapped document store.
    inner: S,
    /// Sink receiving passthrough audit events.
    audit: Arc<dyn IsolationAuditSink>,
}

impl<S> TenantScopedStore<S> {
    /// Wraps a store with isolation enforcement and no audit sink.
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            audit: Arc::new(NoopIsolationAuditSink),
        }
    }

    /// Wraps a store with isolation enforcement and the given audit sink.
    #[must_use]
    pub fn with_audit(inner: S, audit: Arc<dyn IsolationAuditSink>) -> Self {
        Self {
            inner,
            audit,
        }
    }

    /// Returns a reference to the wrapped store.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Evaluates the isolation algorithm for one operation.
    fn narrowing(options: ReadOptions) -> Narrowing {
        if options.bypass_isolation {
            return Narrowing::Passthrough(
                PassthroughReason::ExplicitOption,
                context::current_principal(),
            );
        }
        let Some(principal) = context::current_principal() else {
            return Narrowing::Passthrough(PassthroughReason::NoPrincipal, None);
        };
        if principal.bypasses_isolation() {
            return Narrowing::Passthrough(PassthroughReason::BypassRole, Some(principal));
        }
        match context::current_tenant() {
            Some(tenant_id) => Narrowing::Scoped(tenant_id),
            None => Narrowing::Unscoped,
        }
    }

    /// Applies the isolation algorithm to a filter, emitting audit events.
    fn narrowed_filter(&self, collection: &str, operation: &'static str, filter: &Filter) -> Filter {
        match Self::narrowing(ReadOptions::new()) {
            Narrowing::Scoped(tenant_id) => filter.clone().and_tenant(&tenant_id),
            Narrowing::Passthrough(reason, principal) => {
                self.record_passthrough(collection, operation, reason, principal.as_ref());
                filter.clone()
            }
            Narrowing::Unscoped => filter.clone(),
        }
    }

    /// Records a passthrough audit event.
    fn record_passthrough(
        &self,
        collection: &str,
        operation: &'static str,
        reason: PassthroughReason,
        principal: Option<&Principal>,
    ) {
        let event = IsolationEvent::passthrough(
            collection,
            operation,
            reason,
            principal.map(|p| p.id.as_str().to_string()),
        );
        self.audit.record(&event);
    }

    /// Resolves the filter for an operation, honoring the bypass option.
    fn effective_filter(
        &self,
        collection: &str,
        operation: &'static str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Filter {
        if options.bypass_isolation {
            self.record_passthrough(
                collection,
                operation,
                PassthroughReason::ExplicitOption,
                context::current_principal().as_ref(),
            );
            return filter.clone();
        }
        self.narrowed_filter(collection, operation, filter)
    }
}

#[async_trait]
impl<S> DocumentStore for TenantScopedStore<S>
where
    S: DocumentStore,
{
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        // Creation must stay inside the caller's tenant unless the path is
        // explicitly trusted (no principal, bypass role).
        match Self::narrowing(ReadOptions::new()) {
            Narrowing::Scoped(tenant_id) if document.tenant_id() != &tenant_id => {
                Err(StoreError::Invalid(format!(
                    "cross-tenant insert rejected for collection {collection}"
                )))
            }
            _ => self.inner.insert(collection, document).await,
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let filter = self.effective_filter(collection, "find", filter, options);
        self.inner.find(collection, &filter, options).await
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        options: ReadOptions,
    ) -> Result<Option<Document>, StoreError> {
        let found = self.inner.find_by_id(collection, id, options).await?;
        match Self::narrowing(options) {
            Narrowing::Passthrough(reason, principal) => {
                self.record_passthrough(collection, "find_by_id", reason, principal.as_ref());
                Ok(found)
            }
            Narrowing::Scoped(tenant_id) => {
                // Cross-tenant hits are indistinguishable from absent rows.
                Ok(found.filter(|document| document.tenant_id() == &tenant_id))
            }
            Narrowing::Unscoped => Ok(found),
        }
    }

    async fn count(
        &self,
        collection: &str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Result<usize, StoreError> {
        let filter = self.effective_filter(collection, "count", filter, options);
        self.inner.count(collection, &filter, options).await
    }

    async fn delete(
        &self,
        collection: &str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Result<usize, StoreError> {
        let filter = self.effective_filter(collection, "delete", filter, options);
        self.inner.delete(collection, &filter, options).await
    }
}
