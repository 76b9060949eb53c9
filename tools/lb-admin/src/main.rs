//! LB-Admin entry point.
//!
//! ## Usage
//!
//! ```bash
//! lb-admin --data-dir ./data --user alice ensure
//! lb-admin list
//! lb-admin select <LEDGER_ID>
//! lb-admin check --json
//! lb-admin validate --quick
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use lb_admin::{execute, Cli};
use ledger_telemetry::{init_logging, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = TelemetryConfig::from_env().with_verbosity(cli.verbose);
    init_logging(&config).context("Failed to initialize logging")?;

    let outcome = execute(&cli)
        .await
        .with_context(|| format!("{:?} failed for user {}", cli.command, cli.user))?;

    println!("{}", outcome.output);
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
