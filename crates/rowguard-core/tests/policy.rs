// crates/rowguard-core/tests/policy.rs
// ============================================================================
// Module: Policy Engine Tests
// Description: Validate default-deny, ordering, and predicate recovery.
// ============================================================================
//! ## Overview
//! Exercises the allow-list decision algorithm: default-deny with zero
//! matching policies, first-match-allow ordering, blanket policies, and
//! predicate failure recovery against placeholder instances.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

use rowguard_core::Action;
use rowguard_core::ActionMatcher;
use rowguard_core::PolicyEngine;
use rowguard_core::Principal;
use rowguard_core::PrincipalId;
use rowguard_core::PredicateError;
use rowguard_core::ResourceMatcher;
use rowguard_core::ResourceType;
use rowguard_core::Role;
use rowguard_core::TenantId;
use rowguard_core::predicate;
use serde_json::Value;
use serde_json::json;

fn principal(role: Role, tenant: &str, is_active: bool) -> Principal {
    Principal::new(
        PrincipalId::new(format!("user-{}", role.as_str())),
        role,
        TenantId::new(tenant),
        is_active,
    )
}

/// Predicate granting access when the instance tenant matches the principal.
fn same_tenant(user: &Principal, resource: &Value) -> Result<bool, PredicateError> {
    match resource.get("tenant_id") {
        None => Ok(true),
        Some(Value::String(tenant)) => Ok(tenant == user.tenant_id.as_str()),
        Some(other) => Err(PredicateError(format!("unexpected tenant field: {other}"))),
    }
}

#[test]
fn empty_engine_denies_everything() {
    let engine = PolicyEngine::new();
    let admin = principal(Role::Admin, "t1", true);
    assert!(!engine.check(&admin, &ResourceType::new("order"), Action::Read, None));
}

#[test]
fn unmatched_resource_action_pair_denies_for_every_role() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("quotation")),
        ActionMatcher::Exact(Action::Read),
        None,
    );
    for role in [Role::Admin, Role::Manager, Role::Staff, Role::Superadmin] {
        let user = principal(role, "t1", true);
        assert!(
            !engine.check(&user, &ResourceType::new("order"), Action::Delete, None),
            "role {} must be denied with no matching policy",
            role.as_str()
        );
    }
}

#[test]
fn wildcard_policy_grants_admin_every_combination() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Any,
        ActionMatcher::Any,
        Some(predicate(|user, _| Ok(user.role == Role::Admin))),
    );
    let admin = principal(Role::Admin, "t1", true);
    for action in [Action::Read, Action::Create, Action::Update, Action::Delete] {
        assert!(engine.check(&admin, &ResourceType::new("order"), action, Some(&json!({}))));
        assert!(engine.check(&admin, &ResourceType::new("vendor"), action, None));
    }
    let staff = principal(Role::Staff, "t1", true);
    assert!(!engine.check(&staff, &ResourceType::new("order"), Action::Read, None));
}

#[test]
fn any_matching_allow_wins_regardless_of_earlier_refusals() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("order")),
        ActionMatcher::Exact(Action::Read),
        Some(predicate(|_, _| Ok(false))),
    );
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("order")),
        ActionMatcher::Exact(Action::Read),
        Some(predicate(|_, _| Ok(true))),
    );
    let staff = principal(Role::Staff, "t1", true);
    let instance = json!({"tenant_id": "t1"});
    assert!(engine.check(&staff, &ResourceType::new("order"), Action::Read, Some(&instance)));
}

#[test]
fn blanket_policy_without_predicate_allows_match() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("product")),
        ActionMatcher::Exact(Action::Read),
        None,
    );
    let staff = principal(Role::Staff, "t2", false);
    assert!(engine.check(&staff, &ResourceType::new("product"), Action::Read, None));
    assert!(!engine.check(&staff, &ResourceType::new("product"), Action::Update, None));
}

#[test]
fn predicate_failure_on_placeholder_does_not_abort_the_check() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("order")),
        ActionMatcher::Exact(Action::Read),
        Some(predicate(|_, resource| {
            resource
                .get("owner")
                .and_then(Value::as_str)
                .map(|owner| Ok(owner == "someone"))
                .unwrap_or_else(|| Err(PredicateError("owner field required".to_string())))
        })),
    );
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("order")),
        ActionMatcher::Exact(Action::Read),
        Some(predicate(|user, _| Ok(user.role == Role::Manager))),
    );
    let manager = principal(Role::Manager, "t1", true);
    // Collection-level check: first predicate fails on the placeholder, the
    // second still grants.
    assert!(engine.check(&manager, &ResourceType::new("order"), Action::Read, None));
}

#[test]
fn manager_reads_same_tenant_instance_only() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("order")),
        ActionMatcher::Exact(Action::Read),
        Some(predicate(|user, resource| {
            if user.role != Role::Manager {
                return Ok(false);
            }
            same_tenant(user, resource)
        })),
    );
    let manager = principal(Role::Manager, "A1", true);
    let resource_type = ResourceType::new("order");
    let same = json!({"tenant_id": "A1"});
    let other = json!({"tenant_id": "B1"});
    assert!(engine.check(&manager, &resource_type, Action::Read, Some(&same)));
    assert!(!engine.check(&manager, &resource_type, Action::Read, Some(&other)));
}

#[test]
fn inactive_staff_is_refused_by_activity_requirement() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Exact(ResourceType::new("order")),
        ActionMatcher::Any,
        Some(predicate(|user, resource| {
            if user.role != Role::Staff || !user.is_active {
                return Ok(false);
            }
            same_tenant(user, resource)
        })),
    );
    let resource_type = ResourceType::new("order");
    let inactive = principal(Role::Staff, "t1", false);
    assert!(!engine.check(&inactive, &resource_type, Action::Create, Some(&json!({}))));
    let active = principal(Role::Staff, "t1", true);
    assert!(engine.check(&active, &resource_type, Action::Create, Some(&json!({}))));
}

#[test]
fn decision_is_deterministic_for_identical_inputs() {
    let mut engine = PolicyEngine::new();
    engine.add_policy(
        ResourceMatcher::Any,
        ActionMatcher::Exact(Action::Read),
        Some(predicate(|user, resource| same_tenant(user, resource).map(|ok| ok && user.is_active))),
    );
    let manager = principal(Role::Manager, "t1", true);
    let instance = json!({"tenant_id": "t1", "total": 42});
    let resource_type = ResourceType::new("invoice");
    let first = engine.check(&manager, &resource_type, Action::Read, Some(&instance));
    for _ in 0..10 {
        assert_eq!(
            first,
            engine.check(&manager, &resource_type, Action::Read, Some(&instance))
        );
    }
}
