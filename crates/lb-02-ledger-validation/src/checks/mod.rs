//! # Validation Checks
//!
//! One module per phase. Each `run` drives the target through its public
//! operations and returns a summary; an `Err` means the phase itself could
//! not complete.

pub mod default_ledger;
pub mod edge_cases;
pub mod integration;
pub mod performance;
pub mod persistence;
pub mod user_experience;

use crate::config::ValidationConfig;
use crate::domain::ValidationError;
use lb_01_ledger_resolution::{LedgerSelectionHandler, LedgerViewState, StateDescription};
use shared_types::Ledger;
use std::time::Instant;

/// Id used to probe how invalid selections are handled.
pub const INVALID_LEDGER_ID: &str = "invalid_test_ledger";

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Poll the view until `ready` holds or the settle budget runs out.
pub(crate) async fn wait_for_view<F>(
    view: &LedgerSelectionHandler,
    config: &ValidationConfig,
    expectation: &str,
    ready: F,
) -> Result<LedgerViewState, ValidationError>
where
    F: Fn(&LedgerViewState) -> bool,
{
    let start = Instant::now();
    let poll = async {
        loop {
            let state = view.state();
            if ready(&state) {
                return state;
            }
            tokio::time::sleep(config.settle_interval()).await;
        }
    };
    tokio::time::timeout(config.settle_budget(), poll)
        .await
        .map_err(|_| ValidationError::NotSettled {
            expectation: expectation.to_string(),
            waited_ms: elapsed_ms(start),
        })
}

/// View has finished loading and shows at least one ledger.
pub(crate) fn is_loaded(state: &LedgerViewState) -> bool {
    !state.is_loading() && !state.ledgers().is_empty()
}

/// A listed ledger other than the one currently shown.
pub(crate) fn other_ledger(state: &LedgerViewState) -> Option<Ledger> {
    let current = state.current_ledger().map(|l| l.id.as_str());
    state
        .ledgers()
        .iter()
        .find(|l| Some(l.id.as_str()) != current)
        .cloned()
}
