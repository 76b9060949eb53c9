//! Domain invariants for Ledger Resolution
//!
//! Each predicate is pure and checks one rule against a snapshot of a user's
//! ledgers. `find_violations` collects every broken rule for reporting.

use super::value_objects::ConsistencyViolation;
use shared_types::{Ledger, UiPreferences};

/// INVARIANT-1: Single Default
/// Exactly one active ledger of the user is flagged default.
pub fn invariant_single_default(ledgers: &[Ledger]) -> bool {
    ledgers.iter().filter(|l| l.is_active && l.is_default).count() == 1
}

/// INVARIANT-2: Ownership
/// Every ledger listed for a user is owned by that user.
pub fn invariant_owner_matches(ledgers: &[Ledger], user_id: &str) -> bool {
    ledgers.iter().all(|l| l.is_owned_by(user_id))
}

/// INVARIANT-3: Live Selection
/// A stored selection is either empty or names an active ledger of the user.
pub fn invariant_selection_valid(prefs: &UiPreferences, ledgers: &[Ledger], user_id: &str) -> bool {
    match prefs.selected_ledger_id.as_deref() {
        None => true,
        Some(id) => ledgers
            .iter()
            .any(|l| l.id == id && l.is_active && l.is_owned_by(user_id)),
    }
}

/// Collect every invariant violation for `user_id`.
///
/// `ledgers` is the raw list returned by the repository, so foreign rows are
/// reported rather than filtered out first.
pub fn find_violations(
    user_id: &str,
    ledgers: &[Ledger],
    prefs: &UiPreferences,
) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();

    if !invariant_owner_matches(ledgers, user_id) {
        for ledger in ledgers.iter().filter(|l| !l.is_owned_by(user_id)) {
            violations.push(ConsistencyViolation::ForeignOwner {
                ledger_id: ledger.id.clone(),
                owner: ledger.user_id.clone(),
            });
        }
    }

    let owned: Vec<Ledger> = ledgers
        .iter()
        .filter(|l| l.is_owned_by(user_id))
        .cloned()
        .collect();
    if !invariant_single_default(&owned) {
        let defaults: Vec<_> = owned
            .iter()
            .filter(|l| l.is_active && l.is_default)
            .map(|l| l.id.clone())
            .collect();
        if defaults.is_empty() {
            violations.push(ConsistencyViolation::NoDefault);
        } else {
            violations.push(ConsistencyViolation::MultipleDefaults {
                ledger_ids: defaults,
            });
        }
    }

    if !invariant_selection_valid(prefs, ledgers, user_id) {
        if let Some(id) = &prefs.selected_ledger_id {
            violations.push(ConsistencyViolation::DanglingSelection {
                ledger_id: id.clone(),
            });
        }
    }

    violations
}
