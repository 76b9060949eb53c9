//! # Default Ledger Service
//!
//! Orchestrates default-ledger creation, selection reconciliation and ledger
//! management over a `LedgerRepository` and a `PreferenceStore`.
//!
//! Every operation re-reads both stores before deciding. Operations that can
//! create or move the default flag run under `default_guard`, so concurrent
//! `ensure_default_ledger` calls inside one process never create two
//! defaults. Preference writes take no lock and keep last-write-wins.

use crate::algorithms::{active_owned, find_owned, pick_default, pick_replacement, sorted_for_display};
use crate::config::ResolutionConfig;
use crate::domain::{
    find_violations, ConsistencyReport, EffectiveLedger, NewLedger, ResolutionError,
    SelectionSource,
};
use crate::ports::inbound::LedgerResolutionApi;
use crate::ports::outbound::{LedgerRepository, PreferenceStore};
use async_trait::async_trait;
use chrono::Utc;
use shared_types::{Ledger, LedgerId};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Default ledger resolution service.
pub struct DefaultLedgerService<R, P>
where
    R: LedgerRepository + ?Sized,
    P: PreferenceStore + ?Sized,
{
    config: ResolutionConfig,
    ledgers: Arc<R>,
    preferences: Arc<P>,
    default_guard: Mutex<()>,
}

impl<R, P> DefaultLedgerService<R, P>
where
    R: LedgerRepository + ?Sized,
    P: PreferenceStore + ?Sized,
{
    /// Create a service with the default configuration.
    pub fn new(ledgers: Arc<R>, preferences: Arc<P>) -> Self {
        Self::with_config(ResolutionConfig::default(), ledgers, preferences)
    }

    pub fn with_config(config: ResolutionConfig, ledgers: Arc<R>, preferences: Arc<P>) -> Self {
        Self {
            config,
            ledgers,
            preferences,
            default_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    pub fn preferences(&self) -> &Arc<P> {
        &self.preferences
    }

    fn validate_user(user_id: &str) -> Result<(), ResolutionError> {
        if user_id.trim().is_empty() {
            return Err(ResolutionError::InvalidUserId);
        }
        Ok(())
    }

    /// Fresh ledger list. Foreign rows are logged and left in place so the
    /// consistency check can report them; resolution ignores them.
    async fn load(&self, user_id: &str) -> Result<Vec<Ledger>, ResolutionError> {
        let ledgers = self.ledgers.get_user_ledgers(user_id).await?;
        for foreign in ledgers.iter().filter(|l| !l.is_owned_by(user_id)) {
            warn!(
                user_id = %user_id,
                ledger_id = %foreign.id,
                owner = %foreign.user_id,
                "[lb-01] Repository returned a ledger owned by another user"
            );
        }
        Ok(ledgers)
    }

    /// Body of `ensure_default_ledger`. Caller holds `default_guard`.
    async fn ensure_default_locked(&self, user_id: &str) -> Result<Ledger, ResolutionError> {
        let ledgers = self.load(user_id).await?;
        match pick_default(&ledgers, user_id) {
            Ok(existing) => {
                debug!("[lb-01] Default ledger {} already exists for {}", existing.id, user_id);
                Ok(existing)
            }
            Err(ResolutionError::NotFound { .. }) => {
                let ledger = self.config.default_ledger_draft().into_ledger(
                    user_id,
                    true,
                    self.config.default_display_order,
                );
                self.ledgers.insert_ledger(ledger.clone()).await?;
                info!(
                    user_id = %user_id,
                    ledger_id = %ledger.id,
                    "[lb-01] Created default ledger"
                );
                Ok(ledger)
            }
            Err(e) => {
                warn!(user_id = %user_id, "[lb-01] {}", e);
                Err(e)
            }
        }
    }

    /// Write back rows captured before a multi-step change that failed.
    async fn restore(&self, originals: Vec<Ledger>) {
        for ledger in originals {
            let ledger_id = ledger.id.clone();
            if let Err(e) = self.ledgers.update_ledger(ledger).await {
                error!(ledger_id = %ledger_id, "[lb-01] Rollback write failed: {}", e);
            }
        }
    }

    /// Point the selection away from `removed_id` if it currently names it.
    async fn repoint_selection(
        &self,
        user_id: &str,
        removed_id: &str,
    ) -> Result<Option<LedgerId>, ResolutionError> {
        let prefs = self.preferences.get_ui_preferences().await?;
        if prefs.selected_ledger_id.as_deref() != Some(removed_id) {
            return Ok(prefs.selected_ledger_id);
        }

        let ledgers = self.load(user_id).await?;
        let replacement = pick_replacement(&ledgers, user_id, removed_id).map(|l| l.id);
        self.preferences
            .update_selected_ledger_id(replacement.clone())
            .await?;
        info!(
            "[lb-01] Selection moved from deleted ledger {} to {:?}",
            removed_id, replacement
        );
        Ok(replacement)
    }
}

#[async_trait]
impl<R, P> LedgerResolutionApi for DefaultLedgerService<R, P>
where
    R: LedgerRepository + ?Sized,
    P: PreferenceStore + ?Sized,
{
    async fn ensure_default_ledger(&self, user_id: &str) -> Result<Ledger, ResolutionError> {
        Self::validate_user(user_id)?;
        let _guard = self.default_guard.lock().await;
        self.ensure_default_locked(user_id).await
    }

    async fn get_default_ledger(&self, user_id: &str) -> Result<Ledger, ResolutionError> {
        Self::validate_user(user_id)?;
        let ledgers = self.load(user_id).await?;
        pick_default(&ledgers, user_id)
    }

    async fn list_ledgers(&self, user_id: &str) -> Result<Vec<Ledger>, ResolutionError> {
        Self::validate_user(user_id)?;
        let ledgers = self.load(user_id).await?;
        let owned: Vec<Ledger> = active_owned(&ledgers, user_id).into_iter().cloned().collect();
        Ok(sorted_for_display(&owned))
    }

    async fn resolve_effective_ledger(
        &self,
        user_id: &str,
    ) -> Result<EffectiveLedger, ResolutionError> {
        Self::validate_user(user_id)?;
        let prefs = self.preferences.get_ui_preferences().await?;

        let stale_id = match prefs.selected_ledger_id {
            None => {
                let default = self.ensure_default_ledger(user_id).await?;
                return Ok(EffectiveLedger::new(
                    default,
                    SelectionSource::DefaultForEmptySelection,
                ));
            }
            Some(id) => {
                let ledgers = self.load(user_id).await?;
                if let Some(selected) = find_owned(&ledgers, user_id, &id) {
                    return Ok(EffectiveLedger::new(selected.clone(), SelectionSource::Selected));
                }
                id
            }
        };

        warn!(
            user_id = %user_id,
            stale_id = %stale_id,
            "[lb-01] Selected ledger is not a live ledger of this user, falling back to default"
        );
        let default = self.ensure_default_ledger(user_id).await?;
        self.preferences
            .update_selected_ledger_id(Some(default.id.clone()))
            .await?;

        Ok(EffectiveLedger::new(
            default,
            SelectionSource::HealedInvalidReference { stale_id },
        ))
    }

    async fn select_ledger(
        &self,
        user_id: &str,
        ledger_id: &str,
    ) -> Result<Ledger, ResolutionError> {
        Self::validate_user(user_id)?;
        let ledgers = self.load(user_id).await?;
        let ledger = find_owned(&ledgers, user_id, ledger_id)
            .cloned()
            .ok_or_else(|| ResolutionError::InvalidReference {
                ledger_id: ledger_id.to_string(),
            })?;

        self.preferences
            .update_selected_ledger_id(Some(ledger.id.clone()))
            .await?;
        debug!("[lb-01] User {} selected ledger {}", user_id, ledger.id);
        Ok(ledger)
    }

    async fn handle_ledger_deleted(
        &self,
        deleted_id: &str,
        user_id: &str,
    ) -> Result<Option<LedgerId>, ResolutionError> {
        Self::validate_user(user_id)?;
        self.repoint_selection(user_id, deleted_id).await
    }

    async fn create_ledger(
        &self,
        user_id: &str,
        draft: NewLedger,
    ) -> Result<Ledger, ResolutionError> {
        Self::validate_user(user_id)?;
        if draft.name.trim().is_empty() {
            return Err(ResolutionError::InvalidLedgerName);
        }

        let _guard = self.default_guard.lock().await;
        let ledgers = self.load(user_id).await?;
        let owned = active_owned(&ledgers, user_id);

        let has_default = owned.iter().any(|l| l.is_default);
        let display_order = owned
            .iter()
            .map(|l| l.display_order)
            .max()
            .map_or(0, |max| max.saturating_add(1));

        let ledger = draft.into_ledger(user_id, !has_default, display_order);
        self.ledgers.insert_ledger(ledger.clone()).await?;
        info!(
            user_id = %user_id,
            ledger_id = %ledger.id,
            is_default = ledger.is_default,
            "[lb-01] Created ledger {:?}",
            ledger.name
        );
        Ok(ledger)
    }

    async fn set_default_ledger(
        &self,
        user_id: &str,
        ledger_id: &str,
    ) -> Result<Ledger, ResolutionError> {
        Self::validate_user(user_id)?;
        let _guard = self.default_guard.lock().await;
        let ledgers = self.load(user_id).await?;

        let target = find_owned(&ledgers, user_id, ledger_id)
            .cloned()
            .ok_or_else(|| ResolutionError::LedgerNotFound {
                ledger_id: ledger_id.to_string(),
            })?;
        let previous: Vec<Ledger> = active_owned(&ledgers, user_id)
            .into_iter()
            .filter(|l| l.is_default && l.id != target.id)
            .cloned()
            .collect();

        // Promote before clearing so a failed write never leaves zero defaults.
        let now = Utc::now();
        let promoted = if target.is_default {
            target.clone()
        } else {
            let mut promoted = target.clone();
            promoted.is_default = true;
            promoted.updated_at = now;
            self.ledgers.update_ledger(promoted.clone()).await?;
            promoted
        };

        let mut cleared_so_far = Vec::with_capacity(previous.len());
        for old in &previous {
            let mut cleared = old.clone();
            cleared.is_default = false;
            cleared.updated_at = now;
            if let Err(e) = self.ledgers.update_ledger(cleared).await {
                warn!(
                    user_id = %user_id,
                    ledger_id = %old.id,
                    "[lb-01] Could not clear old default, rolling back: {}",
                    e
                );
                let mut originals = cleared_so_far;
                if !target.is_default {
                    originals.push(target);
                }
                self.restore(originals).await;
                return Err(e.into());
            }
            cleared_so_far.push(old.clone());
        }

        info!("[lb-01] Ledger {} is now the default for {}", promoted.id, user_id);
        Ok(promoted)
    }

    async fn delete_ledger(&self, user_id: &str, ledger_id: &str) -> Result<(), ResolutionError> {
        Self::validate_user(user_id)?;
        let _guard = self.default_guard.lock().await;
        let ledgers = self.load(user_id).await?;

        let target = ledgers
            .iter()
            .find(|l| l.id == ledger_id && l.is_owned_by(user_id))
            .cloned()
            .ok_or_else(|| ResolutionError::LedgerNotFound {
                ledger_id: ledger_id.to_string(),
            })?;

        let replacement = pick_replacement(&ledgers, user_id, ledger_id);
        if target.is_active && replacement.is_none() {
            return Err(ResolutionError::DefaultLedgerRequired {
                ledger_id: ledger_id.to_string(),
            });
        }

        // The deleted default keeps its flag until the row is gone.
        let mut undo = Vec::new();
        if target.is_active && target.is_default {
            if let Some(successor) = replacement.filter(|l| !l.is_default) {
                let mut promoted = successor.clone();
                promoted.is_default = true;
                promoted.updated_at = Utc::now();
                self.ledgers.update_ledger(promoted).await?;
                info!(
                    "[lb-01] Promoted ledger {} to default before deleting {}",
                    successor.id, ledger_id
                );
                undo.push(successor);
            }
        }

        let removal: Result<(), ResolutionError> =
            match self.repoint_selection(user_id, ledger_id).await {
                Ok(_) => self.ledgers.delete_ledger(ledger_id).await.map_err(Into::into),
                Err(e) => Err(e),
            };
        if let Err(e) = removal {
            warn!(
                user_id = %user_id,
                ledger_id = %ledger_id,
                "[lb-01] Delete failed, undoing default hand-over: {}",
                e
            );
            self.restore(undo).await;
            return Err(e);
        }

        info!(user_id = %user_id, ledger_id = %ledger_id, "[lb-01] Deleted ledger");
        Ok(())
    }

    async fn check_consistency(
        &self,
        user_id: &str,
    ) -> Result<ConsistencyReport, ResolutionError> {
        Self::validate_user(user_id)?;
        let ledgers = self.load(user_id).await?;
        let prefs = self.preferences.get_ui_preferences().await?;

        let owned = active_owned(&ledgers, user_id);
        let violations = find_violations(user_id, &ledgers, &prefs);
        let report = ConsistencyReport {
            user_id: user_id.to_string(),
            ledger_count: owned.len(),
            default_count: owned.iter().filter(|l| l.is_default).count(),
            selected_ledger_id: prefs.selected_ledger_id,
            violations,
        };

        for defect in report.defects() {
            warn!(user_id = %user_id, "[lb-01] Consistency defect: {}", defect);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLedgerRepository, InMemoryPreferenceStore};
    use crate::config::{DEFAULT_LEDGER_COLOR, DEFAULT_LEDGER_ICON, DEFAULT_LEDGER_NAME};
    use crate::domain::ConsistencyViolation;
    use shared_types::{StoreError, UiPreferences};

    type TestService = DefaultLedgerService<InMemoryLedgerRepository, InMemoryPreferenceStore>;

    fn setup() -> (TestService, Arc<InMemoryLedgerRepository>, Arc<InMemoryPreferenceStore>) {
        let repo = Arc::new(InMemoryLedgerRepository::new());
        let prefs = Arc::new(InMemoryPreferenceStore::new());
        let service = DefaultLedgerService::new(repo.clone(), prefs.clone());
        (service, repo, prefs)
    }

    fn make_ledger(id: &str, is_default: bool, order: i32) -> Ledger {
        Ledger::new("u1", id)
            .with_id(id)
            .with_default(is_default)
            .with_display_order(order)
    }

    #[tokio::test]
    async fn test_ensure_creates_default_with_sentinels() {
        let (service, repo, _) = setup();

        let ledger = service.ensure_default_ledger("u1").await.unwrap();

        assert_eq!(ledger.name, DEFAULT_LEDGER_NAME);
        assert_eq!(ledger.icon, DEFAULT_LEDGER_ICON);
        assert_eq!(ledger.color, DEFAULT_LEDGER_COLOR);
        assert_eq!(ledger.user_id, "u1");
        assert_eq!(ledger.display_order, 0);
        assert!(ledger.is_default && ledger.is_active);
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_is_idempotent() {
        let (service, repo, _) = setup();

        let first = service.ensure_default_ledger("u1").await.unwrap();
        let second = service.ensure_default_ledger("u1").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(repo.snapshot().iter().filter(|l| l.is_default).count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_ensure_creates_one_default() {
        let repo = Arc::new(InMemoryLedgerRepository::new());
        let prefs = Arc::new(InMemoryPreferenceStore::new());
        let service = Arc::new(DefaultLedgerService::new(repo.clone(), prefs));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.ensure_default_ledger("u1").await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_reports_multiple_defaults() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("a", true, 0));
        repo.insert_raw(make_ledger("b", true, 1));

        let result = service.ensure_default_ledger("u1").await;
        assert!(matches!(result, Err(ResolutionError::DataConsistency(_))));
        // Nothing merged or created
        assert_eq!(repo.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_get_default_does_not_create() {
        let (service, repo, _) = setup();
        let result = service.get_default_ledger("u1").await;
        assert!(matches!(result, Err(ResolutionError::NotFound { .. })));
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_blank_user_rejected() {
        let (service, _, _) = setup();
        assert_eq!(
            service.ensure_default_ledger("  ").await,
            Err(ResolutionError::InvalidUserId)
        );
    }

    #[tokio::test]
    async fn test_resolve_null_preference_bootstraps() {
        let (service, repo, prefs) = setup();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();

        assert_eq!(effective.source, SelectionSource::DefaultForEmptySelection);
        assert!(effective.ledger.is_default);
        assert_eq!(repo.snapshot().len(), 1);
        // Null preference is left alone
        assert_eq!(prefs.current(), UiPreferences::default());
    }

    #[tokio::test]
    async fn test_resolve_heals_dangling_preference() {
        let (service, _, prefs) = setup();
        let default = service.ensure_default_ledger("u1").await.unwrap();
        prefs
            .update_selected_ledger_id(Some("not-a-real-id".into()))
            .await
            .unwrap();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();

        assert_eq!(effective.ledger.id, default.id);
        assert!(effective.was_healed());
        assert_eq!(prefs.current().selected_ledger_id, Some(default.id.clone()));

        // Second call settles without another heal
        let again = service.resolve_effective_ledger("u1").await.unwrap();
        assert_eq!(again.ledger.id, default.id);
        assert_eq!(again.source, SelectionSource::Selected);
    }

    #[tokio::test]
    async fn test_resolve_heals_foreign_selection() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("mine", true, 0));
        repo.insert_raw(Ledger::new("u2", "theirs").with_id("theirs").with_default(true));
        prefs.update_selected_ledger_id(Some("theirs".into())).await.unwrap();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();
        assert_eq!(effective.ledger.id, "mine");
        assert_eq!(prefs.current().selected_ledger_id.as_deref(), Some("mine"));
    }

    #[tokio::test]
    async fn test_resolve_keeps_valid_selection() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        prefs.update_selected_ledger_id(Some("x".into())).await.unwrap();

        let effective = service.resolve_effective_ledger("u1").await.unwrap();
        assert_eq!(effective.ledger.id, "x");
        assert_eq!(effective.source, SelectionSource::Selected);
    }

    #[tokio::test]
    async fn test_select_rejects_unknown_id() {
        let (service, _, prefs) = setup();
        service.ensure_default_ledger("u1").await.unwrap();

        let result = service.select_ledger("u1", "nope").await;
        assert!(matches!(result, Err(ResolutionError::InvalidReference { .. })));
        assert_eq!(prefs.current().selected_ledger_id, None);
    }

    #[tokio::test]
    async fn test_handle_deleted_moves_to_surviving_default() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        prefs.update_selected_ledger_id(Some("x".into())).await.unwrap();

        let selected = service.handle_ledger_deleted("x", "u1").await.unwrap();
        assert_eq!(selected.as_deref(), Some("d"));
        assert_eq!(prefs.current().selected_ledger_id.as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn test_handle_deleted_ignores_other_selection() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("y", false, 1));
        prefs.update_selected_ledger_id(Some("y".into())).await.unwrap();

        let selected = service.handle_ledger_deleted("x", "u1").await.unwrap();
        assert_eq!(selected.as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn test_handle_deleted_clears_when_nothing_left() {
        let (service, _, prefs) = setup();
        prefs.update_selected_ledger_id(Some("gone".into())).await.unwrap();

        let selected = service.handle_ledger_deleted("gone", "u1").await.unwrap();
        assert_eq!(selected, None);
        assert_eq!(prefs.current().selected_ledger_id, None);
    }

    #[tokio::test]
    async fn test_create_ledger_orders_after_existing() {
        let (service, _, _) = setup();
        let default = service.ensure_default_ledger("u1").await.unwrap();

        let travel = service
            .create_ledger("u1", NewLedger::named("Travel"))
            .await
            .unwrap();
        let work = service
            .create_ledger("u1", NewLedger::named("Work"))
            .await
            .unwrap();

        assert!(!travel.is_default);
        assert_eq!(travel.display_order, 1);
        assert_eq!(work.display_order, 2);

        let listed = service.list_ledgers("u1").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec![default.id, travel.id, work.id]);
    }

    #[tokio::test]
    async fn test_create_first_ledger_becomes_default() {
        let (service, _, _) = setup();
        let ledger = service
            .create_ledger("u1", NewLedger::named("Household"))
            .await
            .unwrap();
        assert!(ledger.is_default);
        assert_eq!(service.ensure_default_ledger("u1").await.unwrap().id, ledger.id);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, _, _) = setup();
        assert_eq!(
            service.create_ledger("u1", NewLedger::named("   ")).await,
            Err(ResolutionError::InvalidLedgerName)
        );
    }

    #[tokio::test]
    async fn test_set_default_moves_flag() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("a", true, 0));
        repo.insert_raw(make_ledger("b", false, 1));

        let promoted = service.set_default_ledger("u1", "b").await.unwrap();
        assert!(promoted.is_default);

        let defaults: Vec<_> = repo
            .snapshot()
            .into_iter()
            .filter(|l| l.is_default)
            .map(|l| l.id)
            .collect();
        assert_eq!(defaults, vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_set_default_unknown_ledger() {
        let (service, _, _) = setup();
        let result = service.set_default_ledger("u1", "missing").await;
        assert!(matches!(result, Err(ResolutionError::LedgerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_sole_ledger_refused() {
        let (service, repo, _) = setup();
        let only = service.ensure_default_ledger("u1").await.unwrap();

        let result = service.delete_ledger("u1", &only.id).await;
        assert!(matches!(result, Err(ResolutionError::DefaultLedgerRequired { .. })));
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_default_promotes_successor() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("y", false, 2));
        repo.insert_raw(make_ledger("x", false, 1));
        prefs.update_selected_ledger_id(Some("d".into())).await.unwrap();

        service.delete_ledger("u1", "d").await.unwrap();

        let remaining = repo.snapshot();
        assert_eq!(remaining.len(), 2);
        let default = service.get_default_ledger("u1").await.unwrap();
        assert_eq!(default.id, "x");
        assert_eq!(prefs.current().selected_ledger_id.as_deref(), Some("x"));
    }

    fn default_ids(repo: &InMemoryLedgerRepository) -> Vec<String> {
        repo.snapshot()
            .into_iter()
            .filter(|l| l.is_default)
            .map(|l| l.id)
            .collect()
    }

    #[tokio::test]
    async fn test_set_default_rolls_back_when_clearing_fails() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        // First write promotes x, second would clear d.
        repo.fail_nth_update(2);

        let result = service.set_default_ledger("u1", "x").await;

        assert!(matches!(result, Err(ResolutionError::Store(_))));
        assert_eq!(default_ids(&repo), vec!["d".to_string()]);
        assert_eq!(service.get_default_ledger("u1").await.unwrap().id, "d");
    }

    #[tokio::test]
    async fn test_set_default_failed_promote_changes_nothing() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        repo.fail_nth_update(1);

        assert!(service.set_default_ledger("u1", "x").await.is_err());
        assert_eq!(default_ids(&repo), vec!["d".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_default_keeps_one_default_when_promote_fails() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        prefs.update_selected_ledger_id(Some("d".into())).await.unwrap();
        repo.fail_nth_update(1);

        let result = service.delete_ledger("u1", "d").await;

        assert!(matches!(result, Err(ResolutionError::Store(_))));
        assert_eq!(repo.snapshot().len(), 2);
        assert_eq!(default_ids(&repo), vec!["d".to_string()]);
        assert_eq!(prefs.current().selected_ledger_id.as_deref(), Some("d"));
    }

    #[tokio::test]
    async fn test_delete_default_undoes_promotion_when_delete_fails() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        repo.set_fail_deletes(true);

        let result = service.delete_ledger("u1", "d").await;

        assert!(matches!(result, Err(ResolutionError::Store(_))));
        assert_eq!(repo.snapshot().len(), 2);
        assert_eq!(default_ids(&repo), vec!["d".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_default_needs_a_single_write() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        repo.fail_nth_update(2);

        service.delete_ledger("u1", "d").await.unwrap();

        assert_eq!(default_ids(&repo), vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_selected_non_default() {
        let (service, repo, prefs) = setup();
        repo.insert_raw(make_ledger("d", true, 0));
        repo.insert_raw(make_ledger("x", false, 1));
        prefs.update_selected_ledger_id(Some("x".into())).await.unwrap();

        service.delete_ledger("u1", "x").await.unwrap();

        assert_eq!(prefs.current().selected_ledger_id.as_deref(), Some("d"));
        let report = service.check_consistency("u1").await.unwrap();
        assert!(report.violations.is_empty());
    }

    #[tokio::test]
    async fn test_check_consistency_reports_duplicates_and_foreign_rows() {
        let (service, repo, _) = setup();
        repo.insert_raw(make_ledger("a", true, 0));
        repo.insert_raw(make_ledger("b", true, 1));
        repo.insert_raw(Ledger::new("u2", "x").with_id("x"));
        repo.set_owner_filter(false);

        let report = service.check_consistency("u1").await.unwrap();

        assert!(!report.is_consistent());
        assert!(report.has_multiple_defaults());
        assert_eq!(report.default_count, 2);
        assert_eq!(report.ledger_count, 2);
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, ConsistencyViolation::ForeignOwner { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (service, repo, prefs) = setup();
        repo.set_unavailable(true);
        let result = service.ensure_default_ledger("u1").await;
        assert!(matches!(
            result,
            Err(ResolutionError::Store(StoreError::Unavailable(_)))
        ));

        repo.set_unavailable(false);
        prefs.set_unavailable(true);
        let result = service.resolve_effective_ledger("u1").await;
        assert!(matches!(result, Err(ResolutionError::Store(_))));
    }

    #[tokio::test]
    async fn test_dyn_ports() {
        let repo: Arc<dyn LedgerRepository> = Arc::new(InMemoryLedgerRepository::new());
        let prefs: Arc<dyn PreferenceStore> = Arc::new(InMemoryPreferenceStore::new());
        let service = DefaultLedgerService::new(repo, prefs);
        assert!(service.ensure_default_ledger("u1").await.is_ok());
    }
}
