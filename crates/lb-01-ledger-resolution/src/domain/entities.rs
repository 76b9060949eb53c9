//! Core entities for Ledger Resolution

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared_types::{Ledger, UserId};

/// User-supplied fields for a ledger that does not exist yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedger {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl NewLedger {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon: "book".to_string(),
            color: "#3A7AFE".to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Materialize the draft as an active ledger owned by `user_id`.
    pub fn into_ledger(self, user_id: impl Into<UserId>, is_default: bool, display_order: i32) -> Ledger {
        Ledger::new(user_id, self.name)
            .with_description(self.description)
            .with_icon(self.icon)
            .with_color(self.color)
            .with_default(is_default)
            .with_display_order(display_order)
            .with_created_at(Utc::now())
    }
}
