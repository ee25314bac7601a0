//! Per-entity repositories over a document store.
//!
//! Everything above this module talks to records through [`Repository`], keyed by business
//! id. Every guarded mutation (insert-if-absent, modify-if-present, flip-a-flag-once) is a
//! single repository call, so the existence check and the write cannot be interleaved with
//! another request touching the same record.

mod document;
mod repositories;

pub use document::{Collection, DocumentStore};
pub use repositories::Repositories;

use crate::StoreResult;
use carehub_types::RecordKey;
use serde::{de::DeserializeOwned, Serialize};

/// A record kind that can live in a collection.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the backing collection.
    const COLLECTION: &'static str;
    /// Human label used in messages, e.g. `Patient`.
    const LABEL: &'static str;
    /// Plural used in messages, e.g. `patients`.
    const PLURAL: &'static str;

    /// The business identifier. Unique within the collection and never changed after insert.
    fn key(&self) -> &RecordKey;
}

/// Outcome of [`Repository::modify`].
#[derive(Debug, Clone, PartialEq)]
pub enum Modified<E> {
    /// The change was applied and stored; carries the stored record.
    Written(E),
    /// The change closure declined (or tried to alter the key); carries the untouched record.
    Rejected(E),
    /// No record has that key. Nothing was written.
    Missing,
}

/// Storage operations for one entity kind.
///
/// Failures that are part of normal flow (duplicate key, missing record) are reported through
/// return values; [`StoreError`](crate::StoreError) is reserved for the store itself failing.
pub trait Repository<E: Entity>: Send + Sync {
    /// Stores a new record. Returns `false`, leaving the existing record untouched, if the key is
    /// already taken.
    fn insert(&self, entity: E) -> StoreResult<bool>;

    fn find(&self, key: &str) -> StoreResult<Option<E>>;

    /// Every record, in insertion order.
    fn find_all(&self) -> StoreResult<Vec<E>>;

    /// Atomically reads, changes and writes back one record.
    ///
    /// `change` returns `false` to leave the record as it was. Changes that alter the key are
    /// discarded.
    fn modify(
        &self,
        key: &str,
        change: &mut dyn FnMut(&mut E) -> bool,
    ) -> StoreResult<Modified<E>>;

    /// Removes a record. Returns `false` if it did not exist.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Removes every record, returning how many were removed.
    fn remove_all(&self) -> StoreResult<usize>;

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.find(key)?.is_some())
    }

    fn find_where(&self, predicate: &dyn Fn(&E) -> bool) -> StoreResult<Vec<E>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|entity| predicate(entity))
            .collect())
    }
}

/// Reachability probe for the health endpoint.
pub trait Ping: Send + Sync {
    fn ping(&self) -> bool;
}
