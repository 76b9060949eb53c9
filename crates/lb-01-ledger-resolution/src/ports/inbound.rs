//! # Inbound Ports
//!
//! API trait defining what the Ledger Resolution subsystem can do.

use crate::domain::{ConsistencyReport, EffectiveLedger, NewLedger, ResolutionError};
use async_trait::async_trait;
use shared_types::Ledger;

/// Ledger resolution API - inbound port.
///
/// Every call re-reads the ledger list and preference before deciding.
#[async_trait]
pub trait LedgerResolutionApi: Send + Sync {
    /// Return the user's default ledger, creating it when none exists.
    ///
    /// Idempotent: repeated calls return the same ledger id.
    async fn ensure_default_ledger(&self, user_id: &str) -> Result<Ledger, ResolutionError>;

    /// Return the default ledger without creating one.
    async fn get_default_ledger(&self, user_id: &str) -> Result<Ledger, ResolutionError>;

    /// Active ledgers of the user sorted for display, default first.
    async fn list_ledgers(&self, user_id: &str) -> Result<Vec<Ledger>, ResolutionError>;

    /// Reconcile the stored selection against the live ledger list.
    ///
    /// Heals a dangling selection by writing the default id back.
    async fn resolve_effective_ledger(
        &self,
        user_id: &str,
    ) -> Result<EffectiveLedger, ResolutionError>;

    /// Persist an explicit user choice. Rejects ids the user does not own.
    async fn select_ledger(&self, user_id: &str, ledger_id: &str)
        -> Result<Ledger, ResolutionError>;

    /// Re-point the selection after `deleted_id` was removed elsewhere.
    ///
    /// Returns the new selection, or `None` when no ledger is left.
    async fn handle_ledger_deleted(
        &self,
        deleted_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, ResolutionError>;

    /// Create a ledger. It becomes the default only if none exists.
    async fn create_ledger(&self, user_id: &str, draft: NewLedger)
        -> Result<Ledger, ResolutionError>;

    /// Move the default flag to `ledger_id`.
    async fn set_default_ledger(
        &self,
        user_id: &str,
        ledger_id: &str,
    ) -> Result<Ledger, ResolutionError>;

    /// Delete a ledger, promoting a replacement default first when needed.
    async fn delete_ledger(&self, user_id: &str, ledger_id: &str) -> Result<(), ResolutionError>;

    /// Read-only invariant check over the stored data.
    async fn check_consistency(&self, user_id: &str)
        -> Result<ConsistencyReport, ResolutionError>;
}
