//! Key-value persistence for the save payload.
//!
//! The engine never touches storage directly. Hosts hand a [`SaveStore`] to
//! a [`ProgressManager`], which reads and writes the payload under a single
//! fixed key.

use std::collections::BTreeMap;

use tracing::debug;

/// Key the save payload lives under.
pub const PROGRESS_KEY: &str = "v4_state";

/// Errors a store can report on write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing medium failed.
    #[error("store I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The key cannot be stored by this backend.
    #[error("invalid store key: {key:?}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

/// A string-to-string store.
pub trait SaveStore {
    /// Read the value under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot persist the value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and hosts without persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Loads and saves the game payload through a [`SaveStore`].
#[derive(Debug, Clone, Default)]
pub struct ProgressManager<S> {
    store: S,
}

impl<S: SaveStore> ProgressManager<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The saved payload, if one exists.
    pub fn load(&self) -> Option<String> {
        self.store.get(PROGRESS_KEY)
    }

    /// Persist `payload`, replacing any earlier save.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`StoreError`].
    pub fn save(&mut self, payload: &str) -> Result<(), StoreError> {
        self.store.set(PROGRESS_KEY, payload)?;
        debug!(bytes = payload.len(), "Progress saved");
        Ok(())
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }
}
