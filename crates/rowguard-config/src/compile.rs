// crates/rowguard-config/src/compile.rs
// ============================================================================
// Module: Policy Compilation
// Description: Compile declarative guard rules into the policy engine.
// Purpose: Turn validated configuration into registered, ordered predicates.
// Dependencies: crate::config, rowguard-core
// ============================================================================

//! ## Overview
//! Compilation happens once at startup. Each declarative rule becomes one
//! registered policy; registration preserves file order because the engine's
//! decision order is the registration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rowguard_core::Action;
use rowguard_core::ActionMatcher;
use rowguard_core::PolicyEngine;
use rowguard_core::PredicateError;
use rowguard_core::Principal;
use rowguard_core::ResourceMatcher;
use rowguard_core::ResourceType;
use rowguard_core::Role;
use rowguard_core::TENANT_FIELD;
use rowguard_core::predicate;
use serde_json::Value;

use crate::config::ConfigError;
use crate::config::GuardConfig;
use crate::config::PolicyRuleConfig;
use crate::config::WILDCARD;

// ============================================================================
// SECTION: Compilation
// ============================================================================

impl GuardConfig {
    /// Compiles the validated configuration into a policy engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration fails validation.
    pub fn compile(&self) -> Result<PolicyEngine, ConfigError> {
        self.validate()?;
        let mut engine = PolicyEngine::new();
        for rule in &self.policies {
            register(&mut engine, rule);
        }
        Ok(engine)
    }
}

/// Builds the default policy engine for the stock role model.
#[must_use]
pub fn default_policy_engine() -> PolicyEngine {
    // Defaults are static and always valid.
    GuardConfig::default().compile().unwrap_or_else(|_| PolicyEngine::new())
}

/// Registers one validated rule with the engine.
fn register(engine: &mut PolicyEngine, rule: &PolicyRuleConfig) {
    let resource = if rule.resource == WILDCARD {
        ResourceMatcher::Any
    } else {
        ResourceMatcher::Exact(ResourceType::new(rule.resource.clone()))
    };
    let action = Action::parse(&rule.action).map_or(ActionMatcher::Any, ActionMatcher::Exact);
    if rule.public {
        engine.add_policy(resource, action, None);
        return;
    }
    let role = rule.role.as_deref().and_then(Role::parse);
    let require_active = rule.require_active;
    let require_tenant_match = rule.require_tenant_match;
    engine.add_policy(
        resource,
        action,
        Some(predicate(move |user: &Principal, instance: &Value| {
            // Validation guarantees the role parsed; an absent role here
            // grants nothing.
            let Some(role) = role else {
                return Ok(false);
            };
            if user.role != role {
                return Ok(false);
            }
            if require_active && !user.is_active {
                return Ok(false);
            }
            if require_tenant_match {
                return tenant_matches(user, instance);
            }
            Ok(true)
        })),
    );
}

/// Grants when the instance has no tenant field or it equals the principal's.
fn tenant_matches(user: &Principal, instance: &Value) -> Result<bool, PredicateError> {
    match instance.get(TENANT_FIELD) {
        None => Ok(true),
        Some(Value::String(tenant)) => Ok(tenant == user.tenant_id.as_str()),
        Some(other) => Err(PredicateError(format!("unexpected tenant field shape: {other}"))),
    }
}
