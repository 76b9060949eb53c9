//! # Algorithms Module
//!
//! Pure selection logic over a user's ledger list. Nothing here touches a
//! store; the service feeds in a fresh snapshot for every call.

pub mod ordering;
pub mod resolution;

pub use ordering::{sort_for_display, sorted_for_display};
pub use resolution::{active_owned, find_owned, pick_default, pick_replacement};
