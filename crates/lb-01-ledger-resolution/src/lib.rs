//! # LB-01: Ledger Resolution Subsystem
//!
//! Guarantees that every user has exactly one default ledger and keeps the
//! persisted "selected ledger" preference pointing at a live ledger.
//!
//! ## Architecture
//!
//! - **Domain**: Ledger drafts, resolution outcomes, consistency violations, invariants
//! - **Algorithms**: Display ordering, default selection, replacement picking
//! - **Ports**: Inbound (`LedgerResolutionApi`) and Outbound (`LedgerRepository`, `PreferenceStore`)
//! - **Application**: `DefaultLedgerService` orchestration
//! - **Adapters**: In-memory and JSON-file stores
//! - **Presentation**: View state and the `select_ledger` intent handler
//!
//! ## Error Recovery
//!
//! | Condition | Handling |
//! |-----------|----------|
//! | No default ledger | Created on demand |
//! | Dangling selection | Falls back to default, writes it back |
//! | Several defaults | Reported, never merged |
//! | Store failure | Propagated as `Err` |

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod presentation;

pub use application::service::DefaultLedgerService;
pub use config::{ResolutionConfig, DEFAULT_LEDGER_DESCRIPTION, DEFAULT_LEDGER_NAME};
pub use domain::entities::*;
pub use domain::errors::ResolutionError;
pub use domain::value_objects::*;
pub use presentation::{LedgerSelectionHandler, LedgerViewState, StateDescription};
pub use ports::inbound::LedgerResolutionApi;
pub use ports::outbound::{LedgerRepository, PreferenceStore};
