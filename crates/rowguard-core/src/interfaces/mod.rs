// crates/rowguard-core/src/interfaces/mod.rs
// ============================================================================
// Module: Rowguard Interfaces
// Description: Backend-agnostic traits consumed and exposed by the core.
// Purpose: Define the document store seam and audit sinks for isolation events.
// Dependencies: crate::core, async-trait, serde, thiserror
// ============================================================================

//! ## Overview
//! Rowguard integrates with its persistence collaborator through the
//! [`DocumentStore`] trait. The isolation layer wraps any implementation of
//! this trait; it never talks to a database directly. Audit sinks mirror the
//! same pluggable pattern for isolation bypass events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::core::Document;
use crate::core::DocumentId;
use crate::core::Filter;

// ============================================================================
// SECTION: Read Options
// ============================================================================

/// Per-operation options honored by the isolation layer.
///
/// # Invariants
/// - `bypass_isolation` defaults to false; bypass is always an explicit opt-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Skip tenant narrowing for this operation (trusted internal paths only).
    pub bypass_isolation: bool,
}

impl ReadOptions {
    /// Builds default options with isolation enforced.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bypass_isolation: false,
        }
    }

    /// Builds options that bypass tenant narrowing.
    #[must_use]
    pub const fn bypassing_isolation() -> Self {
        Self {
            bypass_isolation: true,
        }
    }
}

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("document store io error: {0}")]
    Io(String),
    /// Document payload is invalid for the target collection.
    #[error("document store invalid data: {0}")]
    Invalid(String),
    /// Document identifier already exists in the collection.
    #[error("document store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("document store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Document Store
// ============================================================================

/// Backend-agnostic document store with conjunctive query filtering.
///
/// Implementations own persistence entirely. The isolation layer only
/// requires that `find`, `count`, and `delete` honor the supplied filter and
/// that filters can be extended with one more equality clause.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document into a collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails or the identifier exists.
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Finds documents matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Loads a single document by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        options: ReadOptions,
    ) -> Result<Option<Document>, StoreError>;

    /// Counts documents matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the count fails.
    async fn count(
        &self,
        collection: &str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Result<usize, StoreError>;

    /// Deletes documents matching the filter. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    async fn delete(
        &self,
        collection: &str,
        filter: &Filter,
        options: ReadOptions,
    ) -> Result<usize, StoreError>;
}

// ============================================================================
// SECTION: Isolation Audit
// ============================================================================

/// Reason a scoped operation passed through without tenant narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassthroughReason {
    /// Caller supplied [`ReadOptions::bypass_isolation`].
    ExplicitOption,
    /// No principal was present in the request context.
    NoPrincipal,
    /// Principal holds the reserved bypass role.
    BypassRole,
}

impl PassthroughReason {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitOption => "explicit_option",
            Self::NoPrincipal => "no_principal",
            Self::BypassRole => "bypass_role",
        }
    }
}

/// Isolation passthrough audit event payload.
///
/// # Invariants
/// - Events describe why narrowing was skipped; they never carry row data.
#[derive(Debug, Clone, Serialize)]
pub struct IsolationEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Collection the operation targeted.
    pub collection: String,
    /// Operation label (`find`, `find_by_id`, `count`, `delete`).
    pub operation: &'static str,
    /// Why the operation was not narrowed.
    pub reason: PassthroughReason,
    /// Principal identifier when one was present.
    pub principal_id: Option<String>,
}

impl IsolationEvent {
    /// Builds a passthrough event.
    #[must_use]
    pub fn passthrough(
        collection: &str,
        operation: &'static str,
        reason: PassthroughReason,
        principal_id: Option<String>,
    ) -> Self {
        Self {
            event: "rls_passthrough",
            collection: collection.to_string(),
            operation,
            reason,
            principal_id,
        }
    }
}

/// Audit sink for isolation passthrough decisions.
pub trait IsolationAuditSink: Send + Sync {
    /// Records an isolation audit event.
    fn record(&self, event: &IsolationEvent);
}

/// Isolation audit sink that logs JSON lines to stderr.
pub struct StderrIsolationAuditSink;

impl IsolationAuditSink for StderrIsolationAuditSink {
    fn record(&self, event: &IsolationEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op isolation audit sink.
pub struct NoopIsolationAuditSink;

impl IsolationAuditSink for NoopIsolationAuditSink {
    fn record(&self, _event: &IsolationEvent) {}
}
