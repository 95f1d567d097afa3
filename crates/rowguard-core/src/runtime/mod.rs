// crates/rowguard-core/src/runtime/mod.rs
// ============================================================================
// Module: Rowguard Runtime
// Description: Request context store, policy engine, and isolation decorator.
// Purpose: Execute the isolation and authorization algorithms around any store.
// Dependencies: crate::{core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! Runtime modules implement the ambient request context, the attribute
//! based policy engine, and the tenant-scoped store decorator. All external
//! surfaces (HTTP glue, background jobs) must call into these same modules
//! so the isolation guarantees hold everywhere.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod context;
pub mod policy;
pub mod scoped;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use policy::Action;
pub use policy::ActionMatcher;
pub use policy::PolicyEngine;
pub use policy::PolicyPredicate;
pub use policy::PredicateError;
pub use policy::ResourceMatcher;
pub use policy::predicate;
pub use scoped::TenantScopedStore;
pub use store::InMemoryDocumentStore;
