//! # Presentation
//!
//! State handed to the rendering layer and the intents it calls back with.

pub mod handler;
pub mod view_state;

pub use handler::LedgerSelectionHandler;
pub use view_state::{LedgerViewState, StateDescription};
