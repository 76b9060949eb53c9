//! LB-Admin: command-line access to ledger resolution
//!
//! Operates on the JSON-file stores under `--data-dir`. Every command goes
//! through `DefaultLedgerService`, so the same invariants hold as in the app.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Command};
pub use commands::{execute, Outcome};
pub use error::AdminError;
