//! # Shared Types Crate
//!
//! Ledger entities and storage errors used across the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Ledger` and `UiPreferences` are defined once
//!   here and consumed by every crate that touches ledger state.
//! - **Dumb Records**: these types carry no policy. Default resolution and
//!   selection repair live in `lb-01-ledger-resolution`.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
