//! Error types for Ledger Validation

use lb_01_ledger_resolution::ResolutionError;
use shared_types::StoreError;
use thiserror::Error;

/// Errors that abort a single validation phase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Resolution API call failed
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Preference store call failed
    #[error("Preference store failed: {0}")]
    Store(#[from] StoreError),

    /// View state never reached the expected shape
    #[error("View state did not settle within {waited_ms}ms: {expectation}")]
    NotSettled { expectation: String, waited_ms: u64 },

    /// Report could not be encoded
    #[error("Report serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Serialization(err.to_string())
    }
}
