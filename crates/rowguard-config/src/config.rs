// crates/rowguard-config/src/config.rs
// ============================================================================
// Module: Rowguard Configuration
// Description: Guard configuration loading and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: rowguard-core, serde, toml
// ============================================================================

//! ## Overview
//! Guard configuration is loaded from a TOML file with strict size limits.
//! Validation fails closed: unknown roles, unknown actions, and rules with
//! no constraint are rejected before any policy is registered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use rowguard_core::Action;
use rowguard_core::Role;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "rowguard.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "ROWGUARD_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of policy rules.
pub(crate) const MAX_POLICY_RULES: usize = 256;
/// Maximum number of sensitive field entries.
pub(crate) const MAX_SENSITIVE_FIELDS: usize = 64;
/// Maximum length of a field or resource label.
pub(crate) const MAX_LABEL_LENGTH: usize = 128;
/// Wildcard label accepted for resource and action matchers.
pub(crate) const WILDCARD: &str = "*";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file exceeds the size limit.
    #[error("config file too large: {0} bytes (max {MAX_CONFIG_FILE_SIZE})")]
    TooLarge(usize),
    /// Configuration file is not valid TOML.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Configuration content failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Guard Configuration
// ============================================================================

/// Top-level guard configuration.
///
/// # Invariants
/// - Validation is fail-closed: an invalid file yields no policy engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuardConfig {
    /// Field names stripped from non-privileged update payloads.
    #[serde(default = "default_sensitive_fields")]
    pub sensitive_fields: Vec<String>,
    /// Ordered policy rules; registration order is decision order.
    #[serde(default, rename = "policy")]
    pub policies: Vec<PolicyRuleConfig>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            sensitive_fields: default_sensitive_fields(),
            policies: default_policy_rules(),
        }
    }
}

/// Default sensitive field list guarded against mass assignment.
fn default_sensitive_fields() -> Vec<String> {
    ["tenant_id", "role", "permissions", "flags", "mfa_enabled", "mfa_secret"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Default rule set mirroring the stock role model.
fn default_policy_rules() -> Vec<PolicyRuleConfig> {
    vec![
        // Admins can do anything within their tenant.
        PolicyRuleConfig {
            resource: WILDCARD.to_string(),
            action: WILDCARD.to_string(),
            role: Some("admin".to_string()),
            require_active: false,
            require_tenant_match: false,
            public: false,
        },
        // Managers can read everything in their tenant.
        PolicyRuleConfig {
            resource: WILDCARD.to_string(),
            action: "read".to_string(),
            role: Some("manager".to_string()),
            require_active: false,
            require_tenant_match: true,
            public: false,
        },
        // Active staff can work orders in their tenant.
        PolicyRuleConfig {
            resource: "order".to_string(),
            action: WILDCARD.to_string(),
            role: Some("staff".to_string()),
            require_active: true,
            require_tenant_match: true,
            public: false,
        },
    ]
}

impl GuardConfig {
    /// Loads configuration from the default path or `ROWGUARD_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable or invalid.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path =
            env::var(CONFIG_ENV_VAR).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from);
        Self::load(&path)
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable, oversized,
    /// unparseable, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if raw.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge(raw.len()));
        }
        let config: Self = toml::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensitive_fields.len() > MAX_SENSITIVE_FIELDS {
            return Err(ConfigError::Invalid(format!(
                "sensitive_fields exceeds {MAX_SENSITIVE_FIELDS} entries"
            )));
        }
        for field in &self.sensitive_fields {
            if field.is_empty() || field.len() > MAX_LABEL_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "sensitive field name must be 1..={MAX_LABEL_LENGTH} bytes"
                )));
            }
        }
        if self.policies.len() > MAX_POLICY_RULES {
            return Err(ConfigError::Invalid(format!(
                "policy list exceeds {MAX_POLICY_RULES} rules"
            )));
        }
        for (idx, rule) in self.policies.iter().enumerate() {
            rule.validate().map_err(|err| ConfigError::Invalid(format!("policy[{idx}]: {err}")))?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Policy Rules
// ============================================================================

/// Declarative allow rule compiled into the policy engine.
///
/// # Invariants
/// - A rule is either role-constrained or explicitly `public`, never both
///   and never neither; blanket grants must be deliberate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyRuleConfig {
    /// Resource type label or `*`.
    pub resource: String,
    /// Action label (`read`, `create`, `update`, `delete`) or `*`.
    pub action: String,
    /// Role the rule grants to.
    #[serde(default)]
    pub role: Option<String>,
    /// Require the principal account to be active.
    #[serde(default)]
    pub require_active: bool,
    /// Require the resource instance tenant to match the principal's.
    #[serde(default)]
    pub require_tenant_match: bool,
    /// Blanket allow with no principal constraint (explicit opt-in).
    #[serde(default)]
    pub public: bool,
}

impl PolicyRuleConfig {
    /// Validates one rule.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.resource.is_empty() || self.resource.len() > MAX_LABEL_LENGTH {
            return Err(format!("resource label must be 1..={MAX_LABEL_LENGTH} bytes"));
        }
        if self.action != WILDCARD && Action::parse(&self.action).is_none() {
            return Err(format!("unknown action '{}'", self.action));
        }
        match (&self.role, self.public) {
            (Some(role), false) => {
                if Role::parse(role).is_none() {
                    return Err(format!("unknown role '{role}'"));
                }
                Ok(())
            }
            (None, true) => {
                if self.require_active || self.require_tenant_match {
                    return Err("public rule cannot carry principal constraints".to_string());
                }
                Ok(())
            }
            (Some(_), true) => Err("rule cannot be both role-constrained and public".to_string()),
            (None, false) => Err("rule must set role or public".to_string()),
        }
    }
}
