//! Test doubles shared by the unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hyno_store::{KeyValueBackend, MemoryBackend, Store, StoreError};

/// In-memory backend whose writes can be switched off, the way a full
/// browser storage quota refuses them.
#[derive(Clone, Default)]
pub(crate) struct QuotaBackend {
    inner: MemoryBackend,
    full: Arc<AtomicBool>,
}

impl QuotaBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn store(&self) -> Store {
        Store::new(self.clone())
    }

    /// Refuse every write from now on.
    pub(crate) fn fill(&self) {
        self.full.store(true, Ordering::SeqCst);
    }
}

impl KeyValueBackend for QuotaBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.full.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.inner.keys()
    }
}
