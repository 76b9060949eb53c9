//! # Error Types
//!
//! Defines storage errors shared by every ledger and preference adapter.

use thiserror::Error;

/// Errors raised by ledger repositories and preference stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Backing store cannot be reached (transport or availability failure).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem read or write failed.
    #[error("Store I/O error: {0}")]
    Io(String),

    /// Record could not be encoded or decoded.
    #[error("Store serialization error: {0}")]
    Serialization(String),

    /// Persisted document exists but cannot be parsed.
    #[error("Store corrupted at {path}: {message}")]
    Corrupted { path: String, message: String },

    /// Write targeted a record that does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Insert collided with an existing record id.
    #[error("Duplicate record id: {0}")]
    Duplicate(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
