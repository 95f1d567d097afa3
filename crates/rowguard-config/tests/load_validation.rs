// crates/rowguard-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Tests
// Description: Validate TOML loading, limits, and unknown-field rejection.
// Purpose: Ensure file inputs are treated as untrusted and fail closed.
// ============================================================================

//! Configuration loading tests for rowguard-config.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions are permitted."
)]

use std::io::Write;

use rowguard_config::ConfigError;
use rowguard_config::GuardConfig;

/// Writes TOML content to a temp file and loads it.
fn load_toml(content: &str) -> Result<GuardConfig, ConfigError> {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    GuardConfig::load(file.path())
}

#[test]
fn well_formed_config_loads() {
    let config = load_toml(
        r#"
sensitive_fields = ["tenant_id", "role"]

[[policy]]
resource = "*"
action = "*"
role = "admin"

[[policy]]
resource = "product"
action = "read"
public = true
"#,
    )
    .expect("config loads");
    assert_eq!(config.policies.len(), 2);
    assert_eq!(config.sensitive_fields.len(), 2);
    assert!(config.compile().is_ok());
}

#[test]
fn unknown_top_level_field_is_rejected() {
    let result = load_toml(
        r#"
surprise = true
"#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn unknown_rule_field_is_rejected() {
    let result = load_toml(
        r#"
[[policy]]
resource = "order"
action = "read"
role = "staff"
effect = "deny"
"#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn invalid_rule_content_is_rejected_on_load() {
    let result = load_toml(
        r#"
[[policy]]
resource = "order"
action = "read"
role = "owner"
"#,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = GuardConfig::load(std::path::Path::new("/nonexistent/rowguard.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn empty_file_yields_defaulted_sections() {
    let config = load_toml("").expect("empty config loads");
    // An empty file gets the default sensitive fields and no rules, which
    // compiles into a deny-everything engine.
    assert!(config.policies.is_empty());
    assert!(!config.sensitive_fields.is_empty());
    let engine = config.compile().expect("compiles");
    assert!(engine.is_empty());
}
