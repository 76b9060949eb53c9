//! Domain module for Ledger Validation
//!
//! Phase results, per-category summaries, grading and the run state machine.

pub mod errors;
pub mod report;
pub mod summaries;

pub use errors::*;
pub use report::*;
pub use summaries::*;
