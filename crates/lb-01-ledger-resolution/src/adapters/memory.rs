//! In-memory ledger and preference stores.
//!
//! Both expose test setters for injecting faults and corrupt data that the
//! resolution service must survive.

use crate::ports::outbound::{LedgerRepository, PreferenceStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Ledger, LedgerId, StoreError, UiPreferences};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::watch;
use tracing::debug;

/// In-memory ledger table.
pub struct InMemoryLedgerRepository {
    ledgers: RwLock<Vec<Ledger>>,
    unavailable: AtomicBool,
    filter_by_owner: AtomicBool,
    update_countdown: AtomicUsize,
    fail_deletes: AtomicBool,
}

impl InMemoryLedgerRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            ledgers: RwLock::new(Vec::new()),
            unavailable: AtomicBool::new(false),
            filter_by_owner: AtomicBool::new(true),
            update_countdown: AtomicUsize::new(0),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Seed with existing rows, bypassing all checks.
    pub fn with_ledgers(ledgers: Vec<Ledger>) -> Self {
        let repo = Self::new();
        *repo.ledgers.write() = ledgers;
        repo
    }

    /// Insert a row as-is. Lets tests plant duplicate defaults.
    pub fn insert_raw(&self, ledger: Ledger) {
        self.ledgers.write().push(ledger);
    }

    /// Make every call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// When disabled, `get_user_ledgers` leaks every row regardless of owner.
    pub fn set_owner_filter(&self, enabled: bool) {
        self.filter_by_owner.store(enabled, Ordering::SeqCst);
    }

    /// Fail the `n`th `update_ledger` call from now, once. Zero disarms.
    pub fn fail_nth_update(&self, n: usize) {
        self.update_countdown.store(n, Ordering::SeqCst);
    }

    /// Make `delete_ledger` fail while other calls keep working.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Copy of all stored rows.
    pub fn snapshot(&self) -> Vec<Ledger> {
        self.ledgers.read().clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory ledger repository offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn get_user_ledgers(&self, user_id: &str) -> Result<Vec<Ledger>, StoreError> {
        self.check_available()?;
        let filter = self.filter_by_owner.load(Ordering::SeqCst);
        let ledgers: Vec<Ledger> = self
            .ledgers
            .read()
            .iter()
            .filter(|l| !filter || l.is_owned_by(user_id))
            .cloned()
            .collect();
        debug!("[lb-01] Loaded {} ledgers for user {}", ledgers.len(), user_id);
        Ok(ledgers)
    }

    async fn insert_ledger(&self, ledger: Ledger) -> Result<(), StoreError> {
        self.check_available()?;
        let mut ledgers = self.ledgers.write();
        if ledgers.iter().any(|l| l.id == ledger.id) {
            return Err(StoreError::Duplicate(ledger.id));
        }
        debug!("[lb-01] Inserting ledger {} for user {}", ledger.id, ledger.user_id);
        ledgers.push(ledger);
        Ok(())
    }

    async fn update_ledger(&self, ledger: Ledger) -> Result<(), StoreError> {
        self.check_available()?;
        let countdown = self
            .update_countdown
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if countdown == Ok(1) {
            return Err(StoreError::Unavailable(format!(
                "injected failure updating ledger {}",
                ledger.id
            )));
        }
        let mut ledgers = self.ledgers.write();
        let slot = ledgers
            .iter_mut()
            .find(|l| l.id == ledger.id)
            .ok_or_else(|| StoreError::NotFound(ledger.id.clone()))?;
        *slot = ledger;
        Ok(())
    }

    async fn delete_ledger(&self, ledger_id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "injected failure deleting ledger {}",
                ledger_id
            )));
        }
        let mut ledgers = self.ledgers.write();
        let before = ledgers.len();
        ledgers.retain(|l| l.id != ledger_id);
        if ledgers.len() == before {
            return Err(StoreError::NotFound(ledger_id.to_string()));
        }
        debug!("[lb-01] Deleted ledger {}", ledger_id);
        Ok(())
    }
}

/// In-memory preference cell backed by a `watch` channel.
///
/// `send_replace` keeps the value even with no subscribers, so the cell
/// behaves as plain last-write-wins storage.
pub struct InMemoryPreferenceStore {
    tx: watch::Sender<UiPreferences>,
    unavailable: AtomicBool,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::with_preferences(UiPreferences::default())
    }

    pub fn with_preferences(prefs: UiPreferences) -> Self {
        let (tx, _rx) = watch::channel(prefs);
        Self {
            tx,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every read and write fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Current value without going through the async port.
    pub fn current(&self) -> UiPreferences {
        self.tx.borrow().clone()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "in-memory preference store offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get_ui_preferences(&self) -> Result<UiPreferences, StoreError> {
        self.check_available()?;
        Ok(self.tx.borrow().clone())
    }

    async fn update_selected_ledger_id(
        &self,
        ledger_id: Option<LedgerId>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        debug!("[lb-01] Selected ledger preference set to {:?}", ledger_id);
        self.tx.send_replace(UiPreferences {
            selected_ledger_id: ledger_id,
        });
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<UiPreferences> {
        self.tx.subscribe()
    }
}
