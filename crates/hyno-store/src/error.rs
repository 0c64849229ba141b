//! Store error types.

use thiserror::Error;

/// Errors that can occur when reading or writing the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure in a file-backed store.
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or decoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend refused or failed the operation.
    #[error("Store operation failed: {0}")]
    Backend(String),

    /// Key contains characters the backend cannot address.
    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
}
