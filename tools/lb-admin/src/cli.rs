//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// LB-Admin: inspect and manage ledgers and the selected-ledger preference
#[derive(Parser, Debug)]
#[command(name = "lb-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding ledgers.json and ui_preferences.json
    #[arg(long, env = "LB_DATA_DIR", default_value = "./ledger-data", global = true)]
    pub data_dir: PathBuf,

    /// User whose ledgers are managed
    #[arg(long, env = "LB_USER_ID", default_value = "local", global = true)]
    pub user: String,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Make sure the user has a default ledger
    Ensure,
    /// List ledgers, default first
    List,
    /// Show the effective ledger, healing a dangling selection
    Resolve,
    /// Select a ledger
    Select { ledger_id: String },
    /// Create a ledger
    Create(CreateArgs),
    /// Make a ledger the default
    SetDefault { ledger_id: String },
    /// Delete a ledger
    Delete { ledger_id: String },
    /// Report invariant violations; exits non-zero on defects
    Check,
    /// Run the validation coordinator
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    pub name: String,

    #[arg(long, default_value = "book")]
    pub icon: String,

    #[arg(long, default_value = "#3A7AFE")]
    pub color: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateArgs {
    /// Default ledger and user experience phases only
    #[arg(long, conflicts_with = "benchmark")]
    pub quick: bool,

    /// Performance, user experience and integration phases
    #[arg(long)]
    pub benchmark: bool,
}
