//! Configuration for Ledger Resolution Subsystem

use crate::domain::entities::NewLedger;
use serde::{Deserialize, Serialize};

/// Name given to the ledger created on first access.
pub const DEFAULT_LEDGER_NAME: &str = "总记账簿";

/// Description given to the ledger created on first access.
pub const DEFAULT_LEDGER_DESCRIPTION: &str = "默认记账簿";

/// Icon key of the auto-created default ledger.
pub const DEFAULT_LEDGER_ICON: &str = "book";

/// Colour of the auto-created default ledger.
pub const DEFAULT_LEDGER_COLOR: &str = "#3A7AFE";

/// Resolution configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Name of the auto-created default ledger
    pub default_name: String,
    /// Description of the auto-created default ledger
    pub default_description: String,
    /// Icon of the auto-created default ledger
    pub default_icon: String,
    /// Colour of the auto-created default ledger
    pub default_color: String,
    /// Display order of the auto-created default ledger
    pub default_display_order: i32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_LEDGER_NAME.to_string(),
            default_description: DEFAULT_LEDGER_DESCRIPTION.to_string(),
            default_icon: DEFAULT_LEDGER_ICON.to_string(),
            default_color: DEFAULT_LEDGER_COLOR.to_string(),
            default_display_order: 0,
        }
    }
}

impl ResolutionConfig {
    /// Draft used when a user has no default ledger yet.
    pub fn default_ledger_draft(&self) -> NewLedger {
        NewLedger {
            name: self.default_name.clone(),
            description: self.default_description.clone(),
            icon: self.default_icon.clone(),
            color: self.default_color.clone(),
        }
    }
}
