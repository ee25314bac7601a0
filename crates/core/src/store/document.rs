//! The document store and the generic collection repository built on it.
//!
//! A [`DocumentStore`] is created once by the process entry point and handed to every
//! repository. It has two backends:
//!
//! - **Memory**: collections live in the [`Collection`] for the lifetime of the process.
//! - **Disk**: each collection is a JSON array in `<data_dir>/<collection>.json`. The file is
//!   re-read at the start of every operation and rewritten (temp file plus rename) after every
//!   mutation, so nothing survives between requests except what is on disk.

use super::{Entity, Modified, Ping, Repository};
use crate::config::CoreConfig;
use crate::constants::COLLECTION_FILE_EXTENSION;
use crate::{StoreError, StoreResult};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum Backend {
    Memory,
    Disk(PathBuf),
}

/// Process-wide store handle.
#[derive(Debug)]
pub struct DocumentStore {
    backend: Backend,
    closed: AtomicBool,
}

impl DocumentStore {
    /// A store whose collections only live in memory.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory,
            closed: AtomicBool::new(false),
        }
    }

    /// A store backed by JSON documents in `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataDirCreation`] if the directory cannot be created.
    pub fn on_disk(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(StoreError::DataDirCreation)?;
        Ok(Self {
            backend: Backend::Disk(data_dir),
            closed: AtomicBool::new(false),
        })
    }

    /// Opens the backend selected by `cfg`.
    pub fn open(cfg: &CoreConfig) -> StoreResult<Self> {
        match cfg.data_dir() {
            Some(dir) => {
                let store = Self::on_disk(dir)?;
                tracing::info!(data_dir = %dir.display(), "opened on-disk document store");
                Ok(store)
            }
            None => {
                tracing::info!("opened in-memory document store");
                Ok(Self::in_memory())
            }
        }
    }

    /// Closes the store. Every later repository operation fails with [`StoreError::Closed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("document store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn collection_path(&self, collection: &str) -> Option<PathBuf> {
        match &self.backend {
            Backend::Memory => None,
            Backend::Disk(dir) => {
                Some(dir.join(format!("{collection}.{COLLECTION_FILE_EXTENSION}")))
            }
        }
    }
}

impl Ping for DocumentStore {
    fn ping(&self) -> bool {
        if self.is_closed() {
            return false;
        }
        match &self.backend {
            Backend::Memory => true,
            Backend::Disk(dir) => dir.is_dir(),
        }
    }
}

/// [`Repository`] for one entity kind over a [`DocumentStore`].
///
/// Every operation holds the collection mutex from the first read to the last write. Build
/// one `Collection` per entity kind per store; two collections for the same kind on a disk
/// store would not share that mutex.
pub struct Collection<E> {
    store: Arc<DocumentStore>,
    documents: Mutex<Vec<E>>,
}

impl<E: Entity> Collection<E> {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            documents: Mutex::new(Vec::new()),
        }
    }

    /// Runs `f` against the current documents. `f` returns its result and whether it changed
    /// anything; changed documents are persisted before the lock is released.
    fn with_documents<R>(&self, f: impl FnOnce(&mut Vec<E>) -> (R, bool)) -> StoreResult<R> {
        self.store.ensure_open()?;
        let mut documents = self
            .documents
            .lock()
            .map_err(|_| StoreError::LockPoisoned(E::COLLECTION))?;

        let path = self.store.collection_path(E::COLLECTION);
        if let Some(path) = &path {
            *documents = load(E::COLLECTION, path)?;
        }

        let (result, changed) = f(&mut *documents);

        if changed {
            if let Some(path) = &path {
                persist(E::COLLECTION, path, &documents[..])?;
            }
        }
        Ok(result)
    }
}

impl<E: Entity> Repository<E> for Collection<E> {
    fn insert(&self, entity: E) -> StoreResult<bool> {
        self.with_documents(|documents| {
            if documents.iter().any(|e| e.key() == entity.key()) {
                return (false, false);
            }
            documents.push(entity);
            (true, true)
        })
    }

    fn find(&self, key: &str) -> StoreResult<Option<E>> {
        self.with_documents(|documents| {
            let found = documents.iter().find(|e| e.key() == key).cloned();
            (found, false)
        })
    }

    fn find_all(&self) -> StoreResult<Vec<E>> {
        self.with_documents(|documents| (documents.clone(), false))
    }

    fn modify(
        &self,
        key: &str,
        change: &mut dyn FnMut(&mut E) -> bool,
    ) -> StoreResult<Modified<E>> {
        self.with_documents(|documents| {
            let Some(slot) = documents.iter_mut().find(|e| e.key() == key) else {
                return (Modified::Missing, false);
            };

            let original = slot.clone();
            if !change(slot) || slot.key() != key {
                *slot = original.clone();
                return (Modified::Rejected(original), false);
            }
            (Modified::Written(slot.clone()), true)
        })
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        self.with_documents(|documents| {
            let before = documents.len();
            documents.retain(|e| e.key() != key);
            let removed = documents.len() != before;
            (removed, removed)
        })
    }

    fn remove_all(&self) -> StoreResult<usize> {
        self.with_documents(|documents| {
            let removed = documents.len();
            documents.clear();
            (removed, removed > 0)
        })
    }
}

fn load<E: DeserializeOwned>(collection: &'static str, path: &Path) -> StoreResult<Vec<E>> {
    match fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Deserialization { collection, source }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(StoreError::CollectionRead { collection, source }),
    }
}

fn persist<E: Serialize>(
    collection: &'static str,
    path: &Path,
    documents: &[E],
) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(documents)
        .map_err(|source| StoreError::Serialization { collection, source })?;

    let tmp = path.with_extension(format!("{COLLECTION_FILE_EXTENSION}.tmp"));
    fs::write(&tmp, bytes).map_err(|source| StoreError::CollectionWrite { collection, source })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::CollectionWrite { collection, source })
}
