//! Error types for durable store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The on-disk store document cannot be decoded.
    #[error("corrupt store at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
