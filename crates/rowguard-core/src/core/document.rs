// crates/rowguard-core/src/core/document.rs
// ============================================================================
// Module: Rowguard Documents and Filters
// Description: Tenant-owned document model and conjunctive query filters.
// Purpose: Provide the minimal document/query shapes the isolation layer operates on.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Rowguard does not own a persistence engine. These types describe the one
//! precondition it imposes on collaborators: every tenant-scoped document
//! carries exactly one tenant identifier, and every query is a conjunction
//! that the isolation layer can extend with one more equality clause without
//! knowing the rest of the query's shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::DocumentId;
use crate::core::identifiers::TenantId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field name carrying the tenant identifier on every scoped document.
pub const TENANT_FIELD: &str = "tenant_id";

// ============================================================================
// SECTION: Document
// ============================================================================

/// Tenant-owned document instance.
///
/// # Invariants
/// - `tenant_id` is assigned at construction and immutable thereafter.
/// - `fields` never contains a `tenant_id` key; the typed field is canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier, unique within its collection.
    pub id: DocumentId,
    /// Owning tenant identifier.
    tenant_id: TenantId,
    /// Remaining document fields.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Builds a document owned by the given tenant.
    ///
    /// Any `tenant_id` key present in `fields` is discarded so the typed
    /// owner assigned here stays canonical.
    #[must_use]
    pub fn new(id: DocumentId, tenant_id: TenantId, mut fields: Map<String, Value>) -> Self {
        fields.remove(TENANT_FIELD);
        Self {
            id,
            tenant_id,
            fields,
        }
    }

    /// Returns the owning tenant identifier.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns a field value by name. The tenant field resolves to the owner.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == TENANT_FIELD {
            return Some(Value::String(self.tenant_id.as_str().to_string()));
        }
        self.fields.get(name).cloned()
    }

    /// Renders the document as a JSON object including the tenant field.
    ///
    /// Policy predicates inspect resource instances through this view.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert(TENANT_FIELD.to_string(), Value::String(self.tenant_id.as_str().to_string()));
        object.insert("id".to_string(), Value::String(self.id.as_str().to_string()));
        Value::Object(object)
    }
}

// ============================================================================
// SECTION: Filter
// ============================================================================

/// Single field-equality clause.
///
/// # Invariants
/// - Clause comparison uses exact JSON value equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field name the clause constrains.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

/// Ordered conjunction of field-equality clauses.
///
/// # Invariants
/// - An empty filter matches every document.
/// - Conjoining preserves all existing clauses unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Clauses that must all hold.
    clauses: Vec<FilterClause>,
}

impl Filter {
    /// Builds an empty filter matching every document.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Returns a filter with one additional equality clause conjoined.
    #[must_use]
    pub fn and(mut self, field: impl Into<String>, value: Value) -> Self {
        self.clauses.push(FilterClause {
            field: field.into(),
            value,
        });
        self
    }

    /// Returns a filter scoped to the given tenant.
    #[must_use]
    pub fn and_tenant(self, tenant_id: &TenantId) -> Self {
        self.and(TENANT_FIELD, Value::String(tenant_id.as_str().to_string()))
    }

    /// Returns the clauses in conjunction order.
    #[must_use]
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Returns true when the document satisfies every clause.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|clause| document.field(&clause.field).is_some_and(|value| value == clause.value))
    }
}
