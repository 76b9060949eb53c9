//! Intent handler behind the ledger selector.
//!
//! Turns user intents into `LedgerResolutionApi` calls and publishes the
//! resulting `LedgerViewState` on a `watch` channel. Errors land in
//! `last_error`; nothing here panics or propagates to the renderer.

use super::view_state::LedgerViewState;
use crate::domain::{EffectiveLedger, NewLedger, ResolutionError, SelectionSource};
use crate::ports::inbound::LedgerResolutionApi;
use shared_types::{Ledger, UserId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct LedgerSelectionHandler {
    api: Arc<dyn LedgerResolutionApi>,
    user_id: UserId,
    state: watch::Sender<LedgerViewState>,
}

impl LedgerSelectionHandler {
    pub fn new(api: Arc<dyn LedgerResolutionApi>, user_id: impl Into<UserId>) -> Self {
        let (state, _rx) = watch::channel(LedgerViewState::default());
        Self {
            api,
            user_id: user_id.into(),
            state,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn subscribe(&self) -> watch::Receiver<LedgerViewState> {
        self.state.subscribe()
    }

    /// Latest published state.
    pub fn state(&self) -> LedgerViewState {
        self.state.borrow().clone()
    }

    /// Resolve the effective ledger and list, then publish.
    pub async fn load(&self) -> LedgerViewState {
        self.state.send_modify(|s| s.is_ledger_loading = true);

        match self.fetch().await {
            Ok((effective, ledgers)) => {
                let selected = match effective.source {
                    SelectionSource::DefaultForEmptySelection => None,
                    _ => Some(effective.ledger.id.clone()),
                };
                debug!(
                    "[lb-01] View loaded {} ledgers, showing {}",
                    ledgers.len(),
                    effective.ledger.id
                );
                self.state.send_modify(|s| {
                    s.current_ledger = Some(effective.ledger);
                    s.selected_ledger_id = selected;
                    s.ledgers = ledgers;
                    s.is_ledger_loading = false;
                    s.last_error = None;
                });
            }
            Err(e) => self.fail(e),
        }
        self.state()
    }

    /// Re-read both stores after something outside this view changed them.
    pub async fn refresh(&self) -> LedgerViewState {
        self.load().await
    }

    /// User picked a ledger in the selector.
    pub async fn select_ledger(&self, ledger_id: &str) -> LedgerViewState {
        match self.api.select_ledger(&self.user_id, ledger_id).await {
            Ok(_) => self.load().await,
            Err(e) => {
                self.fail(e);
                self.state()
            }
        }
    }

    pub async fn create_ledger(&self, draft: NewLedger) -> LedgerViewState {
        match self.api.create_ledger(&self.user_id, draft).await {
            Ok(_) => self.load().await,
            Err(e) => {
                self.fail(e);
                self.state()
            }
        }
    }

    pub async fn delete_ledger(&self, ledger_id: &str) -> LedgerViewState {
        match self.api.delete_ledger(&self.user_id, ledger_id).await {
            Ok(()) => self.load().await,
            Err(e) => {
                self.fail(e);
                self.state()
            }
        }
    }

    async fn fetch(&self) -> Result<(EffectiveLedger, Vec<Ledger>), ResolutionError> {
        let effective = self.api.resolve_effective_ledger(&self.user_id).await?;
        let ledgers = self.api.list_ledgers(&self.user_id).await?;
        Ok((effective, ledgers))
    }

    fn fail(&self, error: ResolutionError) {
        if error.is_recoverable() {
            info!(user_id = %self.user_id, "[lb-01] Ledger view rejected request: {}", error);
        } else {
            warn!(user_id = %self.user_id, "[lb-01] Ledger view error: {}", error);
        }
        self.state.send_modify(|s| {
            s.is_ledger_loading = false;
            s.last_error = Some(error.to_string());
        });
    }
}
