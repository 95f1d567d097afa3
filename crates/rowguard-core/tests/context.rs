// crates/rowguard-core/tests/context.rs
// ============================================================================
// Module: Request Context Tests
// Description: Validate scope isolation under concurrent logical tasks.
// ============================================================================
//! ## Overview
//! Verifies that request scopes follow each logical task's causal chain of
//! continuations across suspension points, that concurrent scopes never
//! contaminate each other, and that out-of-scope access is well-defined.

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

use std::time::Duration;

use rand::Rng;
use rowguard_core::Principal;
use rowguard_core::PrincipalId;
use rowguard_core::Role;
use rowguard_core::TenantId;
use rowguard_core::context;
use serde_json::json;

#[tokio::test]
async fn scope_returns_the_work_output() {
    let output = context::scope(async { 7 }).await;
    assert_eq!(output, 7);
}

#[tokio::test]
async fn accessors_outside_any_scope_are_well_defined() {
    assert!(!context::in_scope());
    assert!(context::current_principal().is_none());
    assert!(context::current_tenant().is_none());
    assert!(context::value("marker").is_none());
    // Setters are no-ops, not failures.
    context::set_tenant(TenantId::new("t1"));
    assert!(context::current_tenant().is_none());
}

#[tokio::test]
async fn values_survive_suspension_within_one_scope() {
    context::scope(async {
        context::set_value("marker", json!("before-await"));
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(context::value("marker"), Some(json!("before-await")));
    })
    .await;
}

#[tokio::test]
async fn principal_and_tenant_are_scoped() {
    let principal = Principal::new(
        PrincipalId::new("u1"),
        Role::Manager,
        TenantId::new("t1"),
        true,
    );
    context::scope(async {
        context::set_principal(principal.clone());
        context::set_tenant(principal.tenant_id.clone());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(context::current_principal(), Some(principal));
        assert_eq!(context::current_tenant(), Some(TenantId::new("t1")));
    })
    .await;
    assert!(context::current_principal().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fifty_concurrent_scopes_never_leak_markers() {
    let mut tasks = Vec::new();
    for i in 0..50_u64 {
        tasks.push(tokio::spawn(context::scope(async move {
            context::set_value("marker", json!(i));
            let delay = {
                let mut rng = rand::thread_rng();
                rng.gen_range(1..20_u64)
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            assert_eq!(
                context::value("marker"),
                Some(json!(i)),
                "task {i} observed a foreign marker"
            );
        })));
    }
    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tenant_contexts_stay_isolated() {
    let mut tasks = Vec::new();
    for i in 0..16_u64 {
        tasks.push(tokio::spawn(context::scope(async move {
            let tenant = TenantId::new(format!("tenant-{i}"));
            context::set_tenant(tenant.clone());
            tokio::time::sleep(Duration::from_millis(i % 7 + 1)).await;
            assert_eq!(context::current_tenant(), Some(tenant));
        })));
    }
    for task in tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn nested_scope_shadows_and_restores_the_outer_scope() {
    context::scope(async {
        context::set_value("marker", json!("outer"));
        context::scope(async {
            assert!(context::value("marker").is_none());
            context::set_value("marker", json!("inner"));
            assert_eq!(context::value("marker"), Some(json!("inner")));
        })
        .await;
        assert_eq!(context::value("marker"), Some(json!("outer")));
    })
    .await;
}

#[test]
fn sync_scope_supports_non_async_entry_points() {
    let seen = context::sync_scope(|| {
        context::set_value("marker", json!(1));
        context::value("marker")
    });
    assert_eq!(seen, Some(json!(1)));
    assert!(context::value("marker").is_none());
}
