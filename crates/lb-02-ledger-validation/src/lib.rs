//! # LB-02: Ledger Validation Subsystem
//!
//! Diagnostic runs over the ledger resolution subsystem. A run drives the
//! public resolution API, preference store and view handler phase by phase
//! and returns a `ValidationReport`. Validation never repairs data.
//!
//! ## Phases
//!
//! | Phase | Checks |
//! |-------|--------|
//! | Default ledger | Exists, idempotent, sorts first |
//! | State persistence | Write/read-back, view restoration, null fallback |
//! | Edge cases | Empty, oversized and special-character ids, rapid and concurrent switching |
//! | Performance | Initialization, switching, memory |
//! | User experience | Loading state, error handling, responsiveness |
//! | Integration | View matches backend, invalid ids rejected |
//!
//! Grades and recommendations are informational and never gate anything.

pub mod checks;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod report;
pub mod target;

pub use config::ValidationConfig;
pub use coordinator::ValidationCoordinator;
pub use domain::*;
pub use report::log_report;
pub use target::ValidationTarget;
