//! View state for the ledger selector.

use serde::{Deserialize, Serialize};
use shared_types::{Ledger, LedgerId};

/// Everything the ledger selector needs to render.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerViewState {
    /// Ledger currently shown.
    pub current_ledger: Option<Ledger>,
    /// Persisted selection. `None` while the user has never picked one.
    pub selected_ledger_id: Option<LedgerId>,
    /// Active ledgers, default first.
    pub ledgers: Vec<Ledger>,
    pub is_ledger_loading: bool,
    /// Last failure, rendered by the UI as it sees fit.
    pub last_error: Option<String>,
}

/// Typed read access to a view state.
///
/// Diagnostics and tests inspect state through this trait instead of poking
/// at concrete fields.
pub trait StateDescription {
    fn ledgers(&self) -> &[Ledger];

    fn current_ledger(&self) -> Option<&Ledger>;

    fn selected_ledger_id(&self) -> Option<&str>;

    fn is_loading(&self) -> bool;

    fn last_error(&self) -> Option<&str> {
        None
    }

    /// Shown ledger is listed and, when a selection exists, matches it.
    fn is_coherent(&self) -> bool {
        match self.current_ledger() {
            None => self.selected_ledger_id().is_none(),
            Some(current) => {
                self.ledgers().iter().any(|l| l.id == current.id)
                    && self
                        .selected_ledger_id()
                        .map_or(true, |selected| selected == current.id)
            }
        }
    }
}

impl StateDescription for LedgerViewState {
    fn ledgers(&self) -> &[Ledger] {
        &self.ledgers
    }

    fn current_ledger(&self) -> Option<&Ledger> {
        self.current_ledger.as_ref()
    }

    fn selected_ledger_id(&self) -> Option<&str> {
        self.selected_ledger_id.as_deref()
    }

    fn is_loading(&self) -> bool {
        self.is_ledger_loading
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
