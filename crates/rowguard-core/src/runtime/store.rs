// crates/rowguard-core/src/runtime/store.rs
// ============================================================================
// Module: Rowguard In-Memory Store
// Description: Simple in-memory document store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::{core, interfaces}, async-trait
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`DocumentStore`] for tests and local demos. It is not intended for
//! production use; real deployments wrap their persistence collaborator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::Document;
use crate::core::DocumentId;
use crate::core::Filter;
use crate::interfaces::DocumentStore;
use crate::interfaces::ReadOptions;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Collection map keyed by document identifier.
type Collection = BTreeMap<String, Document>;

/// In-memory document store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    /// Collections keyed by name, protected by a mutex.
    collections: Arc<Mutex<BTreeMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Locks the collection map, converting poisoning into a store error.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Collection>>, StoreError> {
        self.collections.lock().map_err(|_| StoreError::Store("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut collections = self.lock()?;
        let entries = collections.entry(collection.to_string()).or_default();
        let key = document.id.as_str().to_string();
        if entries.contains_key(&key) {
            return Err(StoreError::Conflict(format!("document {key} already exists")));
        }
        entries.insert(key, document);
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        _options: ReadOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.lock()?;
        let documents = collections
            .get(collection)
            .map(|entries| {
                entries.values().filter(|document| filter.matches(document)).cloned().collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
        _options: ReadOptions,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.lock()?;
        Ok(collections.get(collection).and_then(|entries| entries.get(id.as_str()).cloned()))
    }

    async fn count(
        &self,
        collection: &str,
        filter: &Filter,
        _options: ReadOptions,
    ) -> Result<usize, StoreError> {
        let collections = self.lock()?;
        let count = collections
            .get(collection)
            .map(|entries| entries.values().filter(|document| filter.matches(document)).count())
            .unwrap_or_default();
        Ok(count)
    }

    async fn delete(
        &self,
        collection: &str,
        filter: &Filter,
        _options: ReadOptions,
    ) -> Result<usize, StoreError> {
        let mut collections = self.lock()?;
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let keys: Vec<String> = entries
            .iter()
            .filter(|(_, document)| filter.matches(document))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            entries.remove(key);
        }
        Ok(keys.len())
    }
}
