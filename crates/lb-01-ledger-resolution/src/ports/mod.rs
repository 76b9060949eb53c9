//! # Ports
//!
//! Inbound API offered to the view layer and outbound contracts the
//! resolution service consumes.

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerResolutionApi;
pub use outbound::{LedgerRepository, PreferenceStore};
