//! Error type for admin commands.

use lb_01_ledger_resolution::ResolutionError;
use lb_02_ledger_validation::ValidationError;
use shared_types::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Could not open data directory: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}
