//! # Display Ordering
//!
//! Default ledger first, then `display_order` ascending, then `created_at`
//! ascending.

use shared_types::Ledger;

/// Sort key: `false < true`, so the default ledger sorts before the rest.
fn display_key(ledger: &Ledger) -> (bool, i32, chrono::DateTime<chrono::Utc>) {
    (!ledger.is_default, ledger.display_order, ledger.created_at)
}

/// Sort ledgers in place for display.
pub fn sort_for_display(ledgers: &mut [Ledger]) {
    ledgers.sort_by_key(display_key);
}

/// Return a sorted copy, leaving the input untouched.
pub fn sorted_for_display(ledgers: &[Ledger]) -> Vec<Ledger> {
    let mut sorted = ledgers.to_vec();
    sort_for_display(&mut sorted);
    sorted
}
