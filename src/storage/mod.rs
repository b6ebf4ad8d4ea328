//! String key-value storage, the equivalent of the browser's local storage.
//!
//! A store is shared by every component of one origin (one user profile on
//! disk, one browser). Writes are last-writer-wins; there is no locking across
//! processes.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StorageError;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A string-keyed, string-valued persistent store.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key` in a single write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`; deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads and decodes the JSON value under `key`.
///
/// A missing key is `Ok(None)`; a value that fails to decode is
/// [`StorageError::Corrupt`].
pub fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|error| StorageError::Corrupt {
            key: key.to_owned(),
            reason: error.to_string(),
        })
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn set_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|error| StorageError::Encode {
        key: key.to_owned(),
        reason: error.to_string(),
    })?;

    store.set(key, &raw)
}
