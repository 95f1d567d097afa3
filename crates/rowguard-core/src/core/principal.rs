// crates/rowguard-core/src/core/principal.rs
// ============================================================================
// Module: Rowguard Principal
// Description: Authenticated actor model consumed by isolation and policy layers.
// Purpose: Provide an immutable, request-lifetime principal with a closed role set.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The principal is resolved once per authentication event by the user
//! management collaborator and is immutable for the request's lifetime.
//! Rowguard never persists principals; it only reads their attributes for
//! isolation and policy decisions.
//!
//! Security posture: the reserved [`Role::Superadmin`] bypasses row-level
//! isolation only. It carries no implicit policy grant; the ABAC layer and
//! the isolation layer are independent by design.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PrincipalId;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Closed role set for authenticated principals.
///
/// # Invariants
/// - Variants are stable for serialization and policy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Tenant administrator.
    Admin,
    /// Tenant manager.
    Manager,
    /// Tenant staff member.
    Staff,
    /// Reserved bypass role with cross-tenant visibility at the isolation layer.
    Superadmin,
}

impl Role {
    /// Returns a stable label for audit events and policy configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
            Self::Superadmin => "superadmin",
        }
    }

    /// Parses a role label. Returns `None` for unknown labels.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "staff" => Some(Self::Staff),
            "superadmin" => Some(Self::Superadmin),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Principal
// ============================================================================

/// Authenticated actor making a request.
///
/// # Invariants
/// - Created once per authentication event; immutable for the request.
/// - `tenant_id` is assigned at account creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier.
    pub id: PrincipalId,
    /// Principal role.
    pub role: Role,
    /// Owning tenant identifier.
    pub tenant_id: TenantId,
    /// Whether the account is active.
    pub is_active: bool,
}

impl Principal {
    /// Builds a principal.
    #[must_use]
    pub const fn new(id: PrincipalId, role: Role, tenant_id: TenantId, is_active: bool) -> Self {
        Self {
            id,
            role,
            tenant_id,
            is_active,
        }
    }

    /// Returns true when the role bypasses row-level isolation.
    #[must_use]
    pub const fn bypasses_isolation(&self) -> bool {
        matches!(self.role, Role::Superadmin)
    }
}
