//! Keyed record storage owned by a single module.
//!
//! Stores are plain keyed maps: the only invariant they enforce is uniqueness
//! of the entity identifier. Each module owns its own store instance; stores
//! are never shared across module boundaries.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};

/// Key/value store abstraction for module-owned records.
pub trait Store<T: Entity>: Send + Sync {
    /// Insert a new record. Fails with `Conflict` if the id is already taken.
    fn create(&self, entity: T) -> DomainResult<T>;
    fn get(&self, id: &T::Id) -> Option<T>;
    fn list(&self) -> Vec<T>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, S> Store<T> for Arc<S>
where
    T: Entity,
    S: Store<T> + ?Sized,
{
    fn create(&self, entity: T) -> DomainResult<T> {
        (**self).create(entity)
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<T> {
        (**self).list()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// In-memory store for tests/dev (and the demo binary).
///
/// Records are kept in insertion order so `list()` is deterministic.
#[derive(Debug)]
pub struct InMemoryStore<T: Entity> {
    inner: RwLock<Records<T>>,
}

#[derive(Debug)]
struct Records<T: Entity> {
    index: HashMap<T::Id, usize>,
    rows: Vec<T>,
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Records {
                index: HashMap::new(),
                rows: Vec::new(),
            }),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> for InMemoryStore<T>
where
    T: Entity + Clone + Send + Sync,
    T::Id: Hash + Send + Sync,
{
    fn create(&self, entity: T) -> DomainResult<T> {
        // A panic while holding the lock cannot leave a half-written record:
        // the index and row are pushed only after the uniqueness check.
        let mut records = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if records.index.contains_key(entity.id()) {
            return Err(DomainError::conflict(format!(
                "record {} already exists",
                entity.id()
            )));
        }

        let position = records.rows.len();
        records.index.insert(entity.id().clone(), position);
        records.rows.push(entity.clone());
        Ok(entity)
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        let records = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        records
            .index
            .get(id)
            .and_then(|&position| records.rows.get(position))
            .cloned()
    }

    fn list(&self) -> Vec<T> {
        let records = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        records.rows.clone()
    }

    fn len(&self) -> usize {
        let records = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        records.rows.len()
    }
}
