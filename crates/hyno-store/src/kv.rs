//! Typed store wrapper with automatic JSON serialization.

use std::path::Path;
use std::sync::Arc;

use serde::ser::SerializeSeq;
use serde::{de::DeserializeOwned, Serialize, Serializer};
use serde_json::Value;

use crate::backend::{FileBackend, KeyValueBackend, MemoryBackend};
use crate::StoreError;

/// Type-safe handle over a [`KeyValueBackend`].
///
/// Values are encoded as JSON. Cloning the handle is cheap and every clone
/// reads and writes the same backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueBackend>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Wrap an arbitrary backend.
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Open a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open a directory-backed store.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = Store::open_dir("./data")?;
    /// ```
    pub fn open_dir(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(FileBackend::open(root)?))
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let orders: Option<Vec<Order>> = store.get(keys::ORDERS)?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Replace the value stored under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, raw)?;
        tracing::trace!(key, "store write");
        Ok(())
    }

    /// Read the array stored under `key` one entry at a time.
    ///
    /// Entries that fail to decode as `T` are kept aside in
    /// [`Records::unreadable`] rather than failing the whole read. A value
    /// that is not an array (or not JSON at all) is kept the same way as a
    /// single unreadable entry. A missing key yields no records.
    pub fn get_records<T: DeserializeOwned>(&self, key: &str) -> Result<Records<T>, StoreError> {
        let mut records = Records::default();
        let Some(raw) = self.backend.get(key)? else {
            return Ok(records);
        };

        let entries = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(Value::Null) => Vec::new(),
            Ok(other) => {
                tracing::warn!(key, "stored value is not a list; keeping it aside");
                records.unreadable.push(other);
                return Ok(records);
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is not JSON; keeping it aside");
                records.unreadable.push(Value::String(raw));
                return Ok(records);
            }
        };

        for (index, entry) in entries.into_iter().enumerate() {
            match T::deserialize(&entry) {
                Ok(item) => records.items.push(item),
                Err(e) => {
                    tracing::warn!(key, index, error = %e, "skipping unreadable record");
                    records.unreadable.push(entry);
                }
            }
        }
        Ok(records)
    }

    /// Replace the array under `key` with `items` followed by the
    /// `unreadable` entries exactly as they were read.
    pub fn set_records<T: Serialize>(
        &self,
        key: &str,
        items: &[T],
        unreadable: &[Value],
    ) -> Result<(), StoreError> {
        self.set(key, &RecordList { items, unreadable })
    }

    /// Remove a value from the store.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    /// Check if a key exists in the store.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.backend.get(key)?.is_some())
    }

    /// Get all keys in the store.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys()
    }
}

/// An array read with [`Store::get_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct Records<T> {
    /// Entries that decoded.
    pub items: Vec<T>,
    /// Raw entries that did not decode, in stored order.
    pub unreadable: Vec<Value>,
}

impl<T> Default for Records<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

struct RecordList<'a, T> {
    items: &'a [T],
    unreadable: &'a [Value],
}

impl<T: Serialize> Serialize for RecordList<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len() + self.unreadable.len()))?;
        for item in self.items {
            seq.serialize_element(item)?;
        }
        for entry in self.unreadable {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}
