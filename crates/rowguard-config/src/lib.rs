// crates/rowguard-config/src/lib.rs
// ============================================================================
// Module: Rowguard Config Library
// Description: Canonical guard config model, validation, and compilation.
// Purpose: Single source of truth for rowguard.toml semantics.
// Dependencies: rowguard-core, serde, toml
// ============================================================================

//! ## Overview
//! `rowguard-config` defines the declarative guard configuration: ordered
//! policy rules and the sensitive-field list. It provides strict,
//! fail-closed validation and compiles rules into the core policy engine at
//! startup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compile;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compile::default_policy_engine;
pub use config::ConfigError;
pub use config::GuardConfig;
pub use config::PolicyRuleConfig;
