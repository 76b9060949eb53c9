//! # Ledger Telemetry
//!
//! Structured logging for every ledgerbook binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LB_SERVICE_NAME` | `ledgerbook` | Service name |
//! | `LB_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `LB_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `LB_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
