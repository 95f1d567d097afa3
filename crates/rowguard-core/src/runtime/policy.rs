// crates/rowguard-core/src/runtime/policy.rs
// ============================================================================
// Module: Rowguard Policy Engine
// Description: Ordered, attribute-based allow-list policy evaluation.
// Purpose: Decide (principal, resource, action, instance) tuples deterministically.
// Dependencies: crate::core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The policy engine evaluates an ordered list of allow policies registered
//! at process startup. A request is authorized when any matching policy
//! grants it; with zero matching policies the decision is deny. There is no
//! explicit-deny rule type: policies are additive grants, and conflict
//! resolution is therefore unnecessary.
//!
//! ## Invariants
//! - Default-deny is unconditional and not configurable.
//! - Decisions are pure functions of the inputs and the registered list.
//! - Registration order is decision order; any matching allow short-circuits.
//!
//! Security posture: policy evaluation is a trust boundary and recovers
//! predicate failures as non-grants rather than surfacing them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::Principal;
use crate::core::ResourceType;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Closed action set for policy decisions.
///
/// # Invariants
/// - Variants are stable for serialization and policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read a resource or list a collection.
    Read,
    /// Create a resource.
    Create,
    /// Update a resource.
    Update,
    /// Delete a resource.
    Delete,
}

impl Action {
    /// Returns a stable label for audit events and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Parses an action label. Returns `None` for unknown labels.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "read" => Some(Self::Read),
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Matchers
// ============================================================================

/// Resource-type matcher with an explicit wildcard variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceMatcher {
    /// Matches every resource type.
    Any,
    /// Matches one resource type exactly.
    Exact(ResourceType),
}

impl ResourceMatcher {
    /// Returns true when the matcher covers the resource type.
    #[must_use]
    pub fn matches(&self, resource: &ResourceType) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(exact) => exact == resource,
        }
    }
}

/// Action matcher with an explicit wildcard variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMatcher {
    /// Matches every action.
    Any,
    /// Matches one action exactly.
    Exact(Action),
}

impl ActionMatcher {
    /// Returns true when the matcher covers the action.
    #[must_use]
    pub fn matches(self, action: Action) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(exact) => exact == action,
        }
    }
}

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Predicate evaluation failure.
///
/// Raised by predicates that cannot evaluate their inputs, typically when a
/// required field is absent from a placeholder instance.
#[derive(Debug, Error)]
#[error("policy predicate failed: {0}")]
pub struct PredicateError(pub String);

/// Shared predicate over (principal, resource instance).
///
/// The instance is an empty JSON object for collection-level checks with no
/// concrete target.
pub type PolicyPredicate = Arc<dyn Fn(&Principal, &Value) -> Result<bool, PredicateError> + Send + Sync>;

/// Wraps a closure into a shareable policy predicate.
#[must_use]
pub fn predicate<F>(f: F) -> PolicyPredicate
where
    F: Fn(&Principal, &Value) -> Result<bool, PredicateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Single registered allow policy.
///
/// # Invariants
/// - A policy with no predicate is a blanket allow for its matchers.
#[derive(Clone)]
pub struct Policy {
    /// Resource-type matcher.
    resource: ResourceMatcher,
    /// Action matcher.
    action: ActionMatcher,
    /// Optional grant predicate.
    predicate: Option<PolicyPredicate>,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Ordered allow-list policy engine.
///
/// # Invariants
/// - Read-only after startup registration; share via `Arc` across tasks.
#[derive(Clone, Default)]
pub struct PolicyEngine {
    /// Registered policies in decision order.
    policies: Vec<Policy>,
}

impl PolicyEngine {
    /// Builds an empty engine that denies everything.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    /// Appends a policy to the decision order.
    pub fn add_policy(
        &mut self,
        resource: ResourceMatcher,
        action: ActionMatcher,
        predicate: Option<PolicyPredicate>,
    ) {
        self.policies.push(Policy {
            resource,
            action,
            predicate,
        });
    }

    /// Returns the number of registered policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true when no policies are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Decides whether the principal may perform the action on the resource.
    ///
    /// With no concrete instance the predicates run against an empty JSON
    /// object; a predicate failure then means "no blanket grant" and the
    /// next policy is consulted. Zero matching policies deny.
    #[must_use]
    pub fn check(
        &self,
        principal: &Principal,
        resource: &ResourceType,
        action: Action,
        instance: Option<&Value>,
    ) -> bool {
        let placeholder = Value::Object(Map::new());
        let target = instance.unwrap_or(&placeholder);
        for policy in &self.policies {
            if !policy.resource.matches(resource) || !policy.action.matches(action) {
                continue;
            }
            let Some(predicate) = &policy.predicate else {
                return true;
            };
            // Failures never abort the decision; the policy simply does not
            // grant and evaluation continues in registration order.
            if matches!(predicate(principal, target), Ok(true)) {
                return true;
            }
        }
        false
    }
}
