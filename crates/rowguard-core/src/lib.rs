// crates/rowguard-core/src/lib.rs
// ============================================================================
// Module: Rowguard Core Library
// Description: Public API surface for the Rowguard core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Rowguard core provides multi-tenant row-level isolation, an ambient
//! request context store, and an attribute-based policy engine. It is
//! backend-agnostic and integrates through explicit interfaces rather than
//! embedding into any web or persistence framework.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::DocumentStore;
pub use interfaces::IsolationAuditSink;
pub use interfaces::IsolationEvent;
pub use interfaces::NoopIsolationAuditSink;
pub use interfaces::PassthroughReason;
pub use interfaces::ReadOptions;
pub use interfaces::StderrIsolationAuditSink;
pub use interfaces::StoreError;
pub use runtime::Action;
pub use runtime::ActionMatcher;
pub use runtime::InMemoryDocumentStore;
pub use runtime::PolicyEngine;
pub use runtime::PolicyPredicate;
pub use runtime::PredicateError;
pub use runtime::ResourceMatcher;
pub use runtime::TenantScopedStore;
pub use runtime::context;
pub use runtime::predicate;
