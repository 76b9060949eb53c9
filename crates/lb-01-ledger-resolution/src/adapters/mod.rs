//! # Adapters
//!
//! Implementations of the outbound ports.
//!
//! - `memory`: `parking_lot`/`watch` backed stores for tests and validation runs
//! - `file`: JSON documents under a data directory, guarded by an `fs2` lock

pub mod file;
pub mod memory;

pub use file::{JsonFileLedgerRepository, JsonFilePreferenceStore, LEDGERS_FILE, PREFERENCES_FILE};
pub use memory::{InMemoryLedgerRepository, InMemoryPreferenceStore};
