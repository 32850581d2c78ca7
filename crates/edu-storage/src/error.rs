//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using durable storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The write would exceed the origin's storage quota.
    #[error("Quota exceeded writing {key}: {required} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        limit: usize,
    },

    /// Storage is disabled for this origin.
    #[error("Storage unavailable")]
    Unavailable,

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),
}
