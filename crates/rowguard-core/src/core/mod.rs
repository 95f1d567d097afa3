// crates/rowguard-core/src/core/mod.rs
// ============================================================================
// Module: Rowguard Core Types
// Description: Canonical identifier, principal, and document structures.
// Purpose: Provide stable, serializable types shared by every Rowguard layer.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Rowguard core types define the principal model, tenant-scoped document
//! shapes, and the identifiers used across the isolation and policy layers.
//! These types are the canonical source of truth for any derived API
//! surfaces.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod document;
pub mod identifiers;
pub mod principal;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use document::Document;
pub use document::Filter;
pub use document::FilterClause;
pub use document::TENANT_FIELD;
pub use identifiers::DocumentId;
pub use identifiers::PrincipalId;
pub use identifiers::ResourceType;
pub use identifiers::TenantId;
pub use principal::Principal;
pub use principal::Role;
