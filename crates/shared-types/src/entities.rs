//! # Core Ledger Entities
//!
//! ## Clusters
//!
//! - **Ledger**: a named accounting workspace owned by one user
//! - **Preferences**: the single persisted "selected ledger" value

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CLUSTER A: LEDGERS
// =============================================================================

/// Stable ledger identifier.
pub type LedgerId = String;

/// Owning user identifier.
pub type UserId = String;

/// A named accounting workspace (book) owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Unique, stable identifier.
    pub id: LedgerId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Icon key understood by the view layer.
    pub icon: String,
    /// Hex colour, e.g. `#3A7AFE`.
    pub color: String,
    /// Owner of this ledger.
    pub user_id: UserId,
    /// Whether this is the user's default ledger.
    pub is_default: bool,
    /// Inactive ledgers are archived and never resolved.
    pub is_active: bool,
    /// Position among non-default ledgers (ascending).
    pub display_order: i32,
    /// Creation time, used as the final sort tiebreaker.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    /// Create an active, non-default ledger with a fresh UUID.
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            icon: "book".to_string(),
            color: "#3A7AFE".to_string(),
            user_id: user_id.into(),
            is_default: false,
            is_active: true,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<LedgerId>) -> Self {
        self.id = id.into();
        self
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

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Whether this ledger belongs to `user_id`.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

// =============================================================================
// CLUSTER B: PREFERENCES
// =============================================================================

/// UI-level preferences persisted once per installation.
///
/// `selected_ledger_id` is stored verbatim. The store never validates it,
/// so it may be empty, very long, or point at a ledger that no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    pub selected_ledger_id: Option<LedgerId>,
}

impl UiPreferences {
    pub fn selecting(ledger_id: impl Into<LedgerId>) -> Self {
        Self {
            selected_ledger_id: Some(ledger_id.into()),
        }
    }
}
