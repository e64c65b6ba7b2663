//! Persistent key-value store adapter.
//!
//! The containers persist session and cart state through [`KeyValueStore`],
//! a string-to-string map with independent, synchronous calls and no
//! transactions. Two backends are provided:
//!
//! - [`MemoryStore`] - process-local map, used in tests and for throwaway sessions
//! - [`FileStore`] - JSON object file on disk that survives restarts
//!
//! Typed access goes through [`StoreExt`], which serializes values with
//! `serde_json`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized or the backing file is not valid JSON.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Synchronous string key-value store.
///
/// Every call stands alone; a failed `set` leaves the previous value in place.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// JSON helpers on top of any [`KeyValueStore`].
pub trait StoreExt: KeyValueStore {
    /// Read and deserialize the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored text is not a
    /// valid `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StorageError::from)
    }

    /// Serialize `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend fails.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    /// Remove several keys, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first backend error.
    fn remove_all(&self, keys: &[&str]) -> Result<(), StorageError> {
        keys.iter().try_for_each(|key| self.remove(key))
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}
