//! In-memory entity store, used by tests and `--memory` serving.

use std::sync::Arc;

use async_trait::async_trait;
use canopy_types::{Entity, Key};
use parking_lot::RwLock;

use crate::{EntityStore, FetchOptions, Query, StoreResult};

/// Entities held in insertion order; that order is the store's native
/// scan order. Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entities: Arc<RwLock<Vec<Entity>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, or replace the one with the same key in place.
    pub fn put(&self, entity: Entity) {
        let mut entities = self.entities.write();
        match entities.iter_mut().find(|e| e.key() == entity.key()) {
            Some(slot) => *slot = entity,
            None => entities.push(entity),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.entities.read().iter().any(|e| e.key() == key)
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn run_query(&self, query: &Query, options: &FetchOptions) -> StoreResult<Vec<Entity>> {
        let entities = self.entities.read();
        let mut results = Vec::new();
        for entity in entities.iter() {
            if results.len() == options.limit {
                break;
            }
            if !query.matches(entity) {
                continue;
            }
            results.push(if query.is_keys_only() {
                Entity::new(entity.key().clone())
            } else {
                entity.clone()
            });
        }
        Ok(results)
    }

    async fn delete(&self, keys: &[Key]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.entities.write().retain(|e| !keys.contains(e.key()));
        Ok(())
    }

    async fn kinds(&self) -> StoreResult<Vec<String>> {
        let entities = self.entities.read();
        let mut kinds: Vec<String> = entities
            .iter()
            .map(|e| e.key().kind().to_string())
            .collect();
        kinds.sort();
        kinds.dedup();
        Ok(kinds)
    }
}
