//! Error types for Ledger Resolution

use super::value_objects::ConsistencyViolation;
use shared_types::{LedgerId, StoreError, UserId};
use thiserror::Error;

/// All errors that can occur while resolving or managing ledgers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Blank user id
    #[error("User id must not be blank")]
    InvalidUserId,

    /// Blank ledger name on create
    #[error("Ledger name must not be blank")]
    InvalidLedgerName,

    /// User has no default ledger yet
    #[error("No default ledger for user {user_id}")]
    NotFound { user_id: UserId },

    /// Selection names a ledger the user does not have
    #[error("Ledger {ledger_id:?} is not an active ledger of the current user")]
    InvalidReference { ledger_id: LedgerId },

    /// Management call targeted a ledger the user does not have
    #[error("Ledger not found: {ledger_id}")]
    LedgerNotFound { ledger_id: LedgerId },

    /// Upstream data breaks the single-default or ownership invariants
    #[error("Data consistency violation: {}", describe(.0))]
    DataConsistency(Vec<ConsistencyViolation>),

    /// Deleting this ledger would leave the user without a default
    #[error("Ledger {ledger_id} is the only ledger and must stay as default")]
    DefaultLedgerRequired { ledger_id: LedgerId },

    /// Ledger repository or preference store failed
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl ResolutionError {
    /// Errors the policy repairs on its own.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ResolutionError::NotFound { .. } | ResolutionError::InvalidReference { .. }
        )
    }
}

fn describe(violations: &[ConsistencyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
