// crates/rowguard-http/src/sanitize/tests.rs
// ============================================================================
// Module: Payload Sanitizer Tests
// Description: Unit tests for field-level write guard rules.
// Purpose: Verify sensitive-field stripping and tenant-field removal.
// Dependencies: rowguard-config, serde_json
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing,
    reason = "test assertions"
)]

use axum::http::Method;
use rowguard_config::GuardConfig;
use serde_json::json;

use super::PayloadSanitizer;

/// Builds a sanitizer from the default guard configuration.
fn sanitizer() -> PayloadSanitizer {
    PayloadSanitizer::from_config(&GuardConfig::default())
}

#[test]
fn strips_sensitive_fields_for_unprivileged_callers() {
    let mut payload = json!({
        "name": "warehouse-3",
        "role": "admin",
        "permissions": ["*"],
        "mfa_secret": "abc",
        "total": 12,
    });
    let removed = sanitizer().apply(&mut payload, false, &Method::POST);

    assert_eq!(payload, json!({"name": "warehouse-3", "total": 12}));
    assert!(removed.contains(&"role".to_owned()));
    assert!(removed.contains(&"permissions".to_owned()));
    assert!(removed.contains(&"mfa_secret".to_owned()));
}

#[test]
fn preserves_sensitive_fields_for_privileged_callers_on_create() {
    let mut payload = json!({"name": "warehouse-3", "role": "staff"});
    let removed = sanitizer().apply(&mut payload, true, &Method::POST);

    assert_eq!(payload, json!({"name": "warehouse-3", "role": "staff"}));
    assert!(removed.is_empty());
}

#[test]
fn removes_tenant_field_on_update_even_for_privileged_callers() {
    let mut payload = json!({"name": "renamed", "tenant_id": "tenant-b"});
    let removed = sanitizer().apply(&mut payload, true, &Method::PUT);

    assert_eq!(payload, json!({"name": "renamed"}));
    assert_eq!(removed, vec!["tenant_id".to_owned()]);
}

#[test]
fn removes_tenant_field_on_patch_for_unprivileged_callers_once() {
    let mut payload = json!({"status": "shipped", "tenant_id": "tenant-b"});
    let removed = sanitizer().apply(&mut payload, false, &Method::PATCH);

    assert_eq!(payload, json!({"status": "shipped"}));
    assert_eq!(removed.iter().filter(|f| *f == "tenant_id").count(), 1);
}

#[test]
fn leaves_tenant_field_in_privileged_create_payloads() {
    let mut payload = json!({"name": "seeded", "tenant_id": "tenant-a"});
    let removed = sanitizer().apply(&mut payload, true, &Method::POST);

    assert_eq!(payload, json!({"name": "seeded", "tenant_id": "tenant-a"}));
    assert!(removed.is_empty());
}

#[test]
fn ignores_non_object_payloads() {
    let mut payload = json!(["role", "permissions"]);
    let removed = sanitizer().apply(&mut payload, false, &Method::POST);

    assert_eq!(payload, json!(["role", "permissions"]));
    assert!(removed.is_empty());
}

#[test]
fn leaves_nested_objects_untouched() {
    let mut payload = json!({"meta": {"role": "admin"}, "role": "admin"});
    sanitizer().apply(&mut payload, false, &Method::POST);

    assert_eq!(payload, json!({"meta": {"role": "admin"}}));
}
