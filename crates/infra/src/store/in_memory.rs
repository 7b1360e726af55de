use std::sync::RwLock;

use verduleria_core::Entity;

use super::r#trait::{EntityStore, StoreError};

/// In-memory, insertion-ordered entity store.
///
/// Lives for the process lifetime; nothing is persisted.
#[derive(Debug)]
pub struct InMemoryStore<E> {
    entities: RwLock<Vec<E>>,
}

impl<E> InMemoryStore<E> {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
        }
    }
}

impl<E> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::backend("lock poisoned")
}

impl<E> EntityStore<E> for InMemoryStore<E>
where
    E: Entity + Send + Sync,
{
    fn insert(&self, entity: E) -> Result<(), StoreError> {
        let mut entities = self.entities.write().map_err(|_| poisoned())?;

        if entities.iter().any(|e| e.key() == entity.key()) {
            tracing::info!(key = entity.key(), "insert rejected: duplicate key");
            return Err(StoreError::Duplicate(entity.key().to_string()));
        }

        tracing::debug!(key = entity.key(), "entity inserted");
        entities.push(entity);
        Ok(())
    }

    fn update_field(&self, key: &str, update: E::Update) -> Result<(), StoreError> {
        let mut entities = self.entities.write().map_err(|_| poisoned())?;

        let entity = entities
            .iter_mut()
            .find(|e| e.key() == key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        tracing::debug!(key, ?update, "entity updated");
        entity.apply(update);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entities = self.entities.write().map_err(|_| poisoned())?;

        let idx = entities
            .iter()
            .position(|e| e.key() == key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        // `remove` (not `swap_remove`) keeps insertion order.
        entities.remove(idx);
        tracing::debug!(key, "entity deleted");
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<E>, StoreError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;
        Ok(entities.clone())
    }

    fn get(&self, key: &str) -> Result<Option<E>, StoreError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;
        Ok(entities.iter().find(|e| e.key() == key).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;
        Ok(entities.len())
    }
}
