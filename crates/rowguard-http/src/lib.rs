// crates/rowguard-http/src/lib.rs
// ============================================================================
// Module: Rowguard HTTP Crate Root
// Description: Axum middleware binding the guard core to HTTP requests.
// Purpose: Expose context establishment, permission guard, and payload
//          sanitization layers for tenant-scoped services.
// Dependencies: axum, rowguard-config, rowguard-core
// ============================================================================

//! ## Overview
//! `rowguard-http` is the HTTP edge of the guard stack. It layers three
//! concerns onto an axum router, outermost first:
//!
//! 1. [`context::context_scope`] opens an isolated ambient context per
//!    request.
//! 2. [`context::attach_principal`] copies the authenticated principal from
//!    request extensions into that context.
//! 3. [`guard::require_permission`] and [`sanitize::sanitize_payload`] make
//!    route-level and field-level decisions against the ambient principal.
//!
//! Authentication itself stays out of scope: any upstream layer that
//! verifies credentials and inserts a `Principal` extension works.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod context;
pub mod guard;
pub mod sanitize;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use audit::AccessAuditEvent;
pub use audit::AccessAuditSink;
pub use audit::FileAccessAuditSink;
pub use audit::NoopAccessAuditSink;
pub use audit::SanitizeAuditEvent;
pub use audit::StderrAccessAuditSink;
pub use context::attach_principal;
pub use context::context_scope;
pub use guard::GuardError;
pub use guard::GuardFuture;
pub use guard::LoadedResource;
pub use guard::PermissionGuard;
pub use guard::require_permission;
pub use sanitize::MAX_SANITIZE_BODY_BYTES;
pub use sanitize::PayloadSanitizer;
pub use sanitize::sanitize_payload;
