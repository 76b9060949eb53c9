//! Value objects for Ledger Resolution

use serde::{Deserialize, Serialize};
use shared_types::{Ledger, LedgerId, UserId};
use std::fmt;

/// How the effective ledger was chosen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionSource {
    /// The stored preference named a live ledger.
    Selected,
    /// No preference was stored; the default ledger was used.
    DefaultForEmptySelection,
    /// The stored preference was dangling; the default replaced it.
    HealedInvalidReference { stale_id: LedgerId },
}

/// Ledger the view layer should display, plus how it was reached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveLedger {
    pub ledger: Ledger,
    pub source: SelectionSource,
}

impl EffectiveLedger {
    pub fn new(ledger: Ledger, source: SelectionSource) -> Self {
        Self { ledger, source }
    }

    /// True when this resolution rewrote the stored preference.
    pub fn was_healed(&self) -> bool {
        matches!(self.source, SelectionSource::HealedInvalidReference { .. })
    }
}

/// Whether a violation is expected churn or an upstream defect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Repaired by the resolution policy without user involvement.
    Recoverable,
    /// Must be surfaced; never corrected automatically.
    Defect,
}

/// A broken ledger invariant observed for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyViolation {
    /// No active ledger is flagged default.
    NoDefault,
    /// More than one active ledger is flagged default.
    MultipleDefaults { ledger_ids: Vec<LedgerId> },
    /// A ledger in the user's list belongs to someone else.
    ForeignOwner { ledger_id: LedgerId, owner: UserId },
    /// The stored preference names no active ledger of this user.
    DanglingSelection { ledger_id: LedgerId },
}

impl ConsistencyViolation {
    pub fn severity(&self) -> ViolationSeverity {
        match self {
            ConsistencyViolation::NoDefault | ConsistencyViolation::DanglingSelection { .. } => {
                ViolationSeverity::Recoverable
            }
            ConsistencyViolation::MultipleDefaults { .. }
            | ConsistencyViolation::ForeignOwner { .. } => ViolationSeverity::Defect,
        }
    }

    pub fn is_defect(&self) -> bool {
        self.severity() == ViolationSeverity::Defect
    }
}

impl fmt::Display for ConsistencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyViolation::NoDefault => write!(f, "no default ledger"),
            ConsistencyViolation::MultipleDefaults { ledger_ids } => {
                write!(f, "{} default ledgers: {}", ledger_ids.len(), ledger_ids.join(", "))
            }
            ConsistencyViolation::ForeignOwner { ledger_id, owner } => {
                write!(f, "ledger {} is owned by {}", ledger_id, owner)
            }
            ConsistencyViolation::DanglingSelection { ledger_id } => {
                write!(f, "selected ledger {:?} does not exist", ledger_id)
            }
        }
    }
}

/// Outcome of a read-only consistency check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub user_id: UserId,
    pub ledger_count: usize,
    pub default_count: usize,
    pub selected_ledger_id: Option<LedgerId>,
    pub violations: Vec<ConsistencyViolation>,
}

impl ConsistencyReport {
    /// No defects. Recoverable violations do not count against consistency.
    pub fn is_consistent(&self) -> bool {
        !self.violations.iter().any(ConsistencyViolation::is_defect)
    }

    pub fn defects(&self) -> impl Iterator<Item = &ConsistencyViolation> {
        self.violations.iter().filter(|v| v.is_defect())
    }

    pub fn has_multiple_defaults(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, ConsistencyViolation::MultipleDefaults { .. }))
    }
}
