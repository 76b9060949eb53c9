//! # Outbound Ports
//!
//! Storage contracts for ledger records and the UI selection preference.
//! Both are owned outside this subsystem; the service re-reads them on every
//! operation and never caches a snapshot.

use async_trait::async_trait;
use shared_types::{Ledger, LedgerId, StoreError, UiPreferences};
use tokio::sync::watch;

/// Ledger record store - outbound port.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Every ledger stored for `user_id`, in storage order.
    ///
    /// Implementations should filter by owner. The service still checks
    /// ownership on each row and reports any foreign ledger it is handed.
    async fn get_user_ledgers(&self, user_id: &str) -> Result<Vec<Ledger>, StoreError>;

    /// Insert a new ledger. Fails with `Duplicate` if the id is taken.
    async fn insert_ledger(&self, ledger: Ledger) -> Result<(), StoreError>;

    /// Replace an existing ledger by id. Fails with `NotFound` if absent.
    async fn update_ledger(&self, ledger: Ledger) -> Result<(), StoreError>;

    /// Remove a ledger by id. Fails with `NotFound` if absent.
    async fn delete_ledger(&self, ledger_id: &str) -> Result<(), StoreError>;
}

/// Selected-ledger preference cell - outbound port.
///
/// The store is a dumb sink: `update_selected_ledger_id` persists any value,
/// including `None`, the empty string, or ids that match nothing.
///
/// # Concurrency
///
/// Writes are not ordered against each other. When two callers race, the
/// last write to land is what every later reader sees. Callers that need a
/// specific outcome must not share the cell.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Current preferences.
    async fn get_ui_preferences(&self) -> Result<UiPreferences, StoreError>;

    /// Persist the selected ledger id verbatim.
    async fn update_selected_ledger_id(&self, ledger_id: Option<LedgerId>)
        -> Result<(), StoreError>;

    /// Stream of preference values. Receives the current value immediately
    /// and every successful write afterwards.
    fn subscribe(&self) -> watch::Receiver<UiPreferences>;
}
