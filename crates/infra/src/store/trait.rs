use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use thiserror::Error;

use verduleria_core::{Entity, Status};

/// Entity store operation error.
///
/// `Duplicate` and `NotFound` are expected outcomes of the CRUD contract and
/// map onto status tokens. `Backend` is an infrastructure failure (connection
/// refused, corrupt row, poisoned lock) and aborts the current command.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Status token for expected outcomes; `None` for backend failures.
    pub fn status(&self) -> Option<Status> {
        match self {
            StoreError::Duplicate(_) => Some(Status::Duplicate),
            StoreError::NotFound(_) => Some(Status::NotFound),
            StoreError::Backend(_) => None,
        }
    }
}

/// Keyed, insertion-ordered collection of entities.
///
/// ## Semantics
///
/// - `insert` fails with `Duplicate` if the key is present; it never overwrites.
/// - `update_field` fails with `NotFound` if the key is absent and otherwise
///   changes only the field named by the update.
/// - `delete` fails with `NotFound` if the key is absent.
/// - `list_all` returns every entity in insertion order (empty if none).
///
/// Keys are the entities' normalized names; callers pass them already
/// normalized by the field validator.
///
/// ## Implementation Requirements
///
/// Implementations backed by shared storage must decide `Duplicate` and
/// `NotFound` atomically with the write (uniqueness constraint, affected-row
/// count) rather than with a separate existence read.
///
/// ## Sessions
///
/// A command runs all of its store calls inside one [`Session`]. Backends that
/// hold connections keep a single connection open from `begin_session` to the
/// matching `end_session`; calls made outside a session get their own.
/// Sessions nest: only the outermost `end_session` releases the connection.
pub trait EntityStore<E: Entity>: Send + Sync {
    fn begin_session(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn end_session(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn insert(&self, entity: E) -> Result<(), StoreError>;

    fn update_field(&self, key: &str, update: E::Update) -> Result<(), StoreError>;

    fn delete(&self, key: &str) -> Result<(), StoreError>;

    fn list_all(&self) -> Result<Vec<E>, StoreError>;

    fn get(&self, key: &str) -> Result<Option<E>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

impl<E, S> EntityStore<E> for Arc<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn begin_session(&self) -> Result<(), StoreError> {
        (**self).begin_session()
    }

    fn end_session(&self) -> Result<(), StoreError> {
        (**self).end_session()
    }

    fn insert(&self, entity: E) -> Result<(), StoreError> {
        (**self).insert(entity)
    }

    fn update_field(&self, key: &str, update: E::Update) -> Result<(), StoreError> {
        (**self).update_field(key, update)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn list_all(&self) -> Result<Vec<E>, StoreError> {
        (**self).list_all()
    }

    fn get(&self, key: &str) -> Result<Option<E>, StoreError> {
        (**self).get(key)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}

impl<E, S> EntityStore<E> for Box<S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn begin_session(&self) -> Result<(), StoreError> {
        (**self).begin_session()
    }

    fn end_session(&self) -> Result<(), StoreError> {
        (**self).end_session()
    }

    fn insert(&self, entity: E) -> Result<(), StoreError> {
        (**self).insert(entity)
    }

    fn update_field(&self, key: &str, update: E::Update) -> Result<(), StoreError> {
        (**self).update_field(key, update)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn list_all(&self) -> Result<Vec<E>, StoreError> {
        (**self).list_all()
    }

    fn get(&self, key: &str) -> Result<Option<E>, StoreError> {
        (**self).get(key)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}

/// Scope guard for one command's store calls.
///
/// Derefs to the store; the session ends when the guard drops.
pub struct Session<'a, E, S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    store: &'a S,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E, S> Session<'a, E, S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    pub fn begin(store: &'a S) -> Result<Self, StoreError> {
        store.begin_session()?;
        Ok(Self {
            store,
            _entity: PhantomData,
        })
    }
}

impl<E, S> Deref for Session<'_, E, S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<E, S> Drop for Session<'_, E, S>
where
    E: Entity,
    S: EntityStore<E> + ?Sized,
{
    fn drop(&mut self) {
        if let Err(e) = self.store.end_session() {
            tracing::warn!(error = %e, "failed to end store session");
        }
    }
}
