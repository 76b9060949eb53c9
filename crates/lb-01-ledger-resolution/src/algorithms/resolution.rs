//! # Default and Replacement Selection
//!
//! Decides which ledger is the default and which one takes over when the
//! selected ledger goes away.

use super::ordering::sorted_for_display;
use crate::domain::{ConsistencyViolation, ResolutionError};
use shared_types::Ledger;

/// Active ledgers owned by `user_id`. Foreign or archived rows never resolve.
pub fn active_owned<'a>(ledgers: &'a [Ledger], user_id: &str) -> Vec<&'a Ledger> {
    ledgers
        .iter()
        .filter(|l| l.is_active && l.is_owned_by(user_id))
        .collect()
}

/// Find an active ledger of `user_id` by id.
pub fn find_owned<'a>(ledgers: &'a [Ledger], user_id: &str, ledger_id: &str) -> Option<&'a Ledger> {
    ledgers
        .iter()
        .find(|l| l.id == ledger_id && l.is_active && l.is_owned_by(user_id))
}

/// The single default among the user's active ledgers.
///
/// - none: `NotFound`
/// - exactly one: that ledger
/// - several: `DataConsistency`, no winner is picked
pub fn pick_default(ledgers: &[Ledger], user_id: &str) -> Result<Ledger, ResolutionError> {
    let defaults: Vec<&Ledger> = active_owned(ledgers, user_id)
        .into_iter()
        .filter(|l| l.is_default)
        .collect();

    match defaults.as_slice() {
        [] => Err(ResolutionError::NotFound {
            user_id: user_id.to_string(),
        }),
        [only] => Ok((*only).clone()),
        many => Err(ResolutionError::DataConsistency(vec![
            ConsistencyViolation::MultipleDefaults {
                ledger_ids: many.iter().map(|l| l.id.clone()).collect(),
            },
        ])),
    }
}

/// Ledger that should take over once `removed_id` is gone.
///
/// Prefers a surviving default, otherwise the first survivor in display
/// order. `None` when nothing survives.
pub fn pick_replacement(ledgers: &[Ledger], user_id: &str, removed_id: &str) -> Option<Ledger> {
    let survivors: Vec<Ledger> = active_owned(ledgers, user_id)
        .into_iter()
        .filter(|l| l.id != removed_id)
        .cloned()
        .collect();

    let sorted = sorted_for_display(&survivors);
    sorted
        .iter()
        .find(|l| l.is_default)
        .or_else(|| sorted.first())
        .cloned()
}
