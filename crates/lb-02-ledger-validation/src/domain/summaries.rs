//! Per-category validation summaries.

use serde::{Deserialize, Serialize};
use shared_types::LedgerId;
use std::fmt;

/// Letter grade, A best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceGrade {
    A,
    B,
    C,
    D,
    F,
}

impl PerformanceGrade {
    /// Grade a 0-100 score: 90+ A, 80+ B, 70+ C, 60+ D, else F.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => PerformanceGrade::A,
            s if s >= 80 => PerformanceGrade::B,
            s if s >= 70 => PerformanceGrade::C,
            s if s >= 60 => PerformanceGrade::D,
            _ => PerformanceGrade::F,
        }
    }

    /// Grade an average duration against ascending A..D upper bounds.
    pub fn from_average_ms(average_ms: u64, thresholds: &[u64; 4]) -> Self {
        const GRADES: [PerformanceGrade; 4] = [
            PerformanceGrade::A,
            PerformanceGrade::B,
            PerformanceGrade::C,
            PerformanceGrade::D,
        ];
        GRADES
            .iter()
            .zip(thresholds.iter())
            .find(|(_, bound)| average_ms < **bound)
            .map_or(PerformanceGrade::F, |(grade, _)| *grade)
    }
}

impl fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            PerformanceGrade::A => "A",
            PerformanceGrade::B => "B",
            PerformanceGrade::C => "C",
            PerformanceGrade::D => "D",
            PerformanceGrade::F => "F",
        };
        f.write_str(letter)
    }
}

/// Qualitative rating for user-experience aspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
    /// Not enough data to judge (e.g. fewer than two ledgers to switch between).
    NotMeasured,
}

impl Rating {
    /// Rate an elapsed time against Excellent/Good/Fair upper bounds.
    pub fn from_elapsed_ms(elapsed_ms: u64, bounds: [u64; 3]) -> Self {
        match elapsed_ms {
            ms if ms < bounds[0] => Rating::Excellent,
            ms if ms < bounds[1] => Rating::Good,
            ms if ms < bounds[2] => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    pub fn points(&self) -> Option<i32> {
        match self {
            Rating::Excellent => Some(100),
            Rating::Good => Some(85),
            Rating::Fair => Some(70),
            Rating::Poor => Some(50),
            Rating::NotMeasured => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rating::Excellent => "excellent",
            Rating::Good => "good",
            Rating::Fair => "fair",
            Rating::Poor => "poor",
            Rating::NotMeasured => "not measured",
        };
        f.write_str(text)
    }
}

/// Common view over every summary so the coordinator can aggregate them.
pub trait PhaseSummary {
    fn success(&self) -> bool;

    fn issues(&self) -> &[String];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultLedgerValidationSummary {
    pub success: bool,
    pub ledger_count: usize,
    pub has_default_ledger: bool,
    /// The effective ledger right now is the default one.
    pub default_ledger_selected: bool,
    pub default_ledger_name: Option<String>,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceValidationSummary {
    pub success: bool,
    /// Preference value found when the phase started.
    pub initial_ledger_id: Option<LedgerId>,
    /// Ledger the phase switched to and expected back.
    pub preferred_ledger_id: Option<LedgerId>,
    pub state_restored_correctly: bool,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCaseValidationSummary {
    pub success: bool,
    pub initialization_time_ms: u64,
    pub handled_edge_cases: Vec<String>,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceValidationSummary {
    pub success: bool,
    pub initialization_time_ms: u64,
    /// `None` when the user has fewer than two ledgers.
    pub switching_time_ms: Option<u64>,
    /// Resident set size, where the platform reports it.
    pub memory_usage_mb: Option<u64>,
    pub performance_grade: PerformanceGrade,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserExperienceValidationSummary {
    pub success: bool,
    pub loading_state_management: Rating,
    pub error_handling: Rating,
    pub interaction_responsiveness: Rating,
    pub overall_rating: PerformanceGrade,
    pub issues: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationValidationSummary {
    pub success: bool,
    pub module_integration_score: i32,
    pub data_consistency_score: i32,
    pub error_handling_score: i32,
    pub overall_integration_rating: PerformanceGrade,
    pub issues: Vec<String>,
}

macro_rules! impl_phase_summary {
    ($($summary:ty),* $(,)?) => {
        $(
            impl PhaseSummary for $summary {
                fn success(&self) -> bool {
                    self.success
                }

                fn issues(&self) -> &[String] {
                    &self.issues
                }
            }
        )*
    };
}

impl_phase_summary!(
    DefaultLedgerValidationSummary,
    PersistenceValidationSummary,
    EdgeCaseValidationSummary,
    PerformanceValidationSummary,
    UserExperienceValidationSummary,
    IntegrationValidationSummary,
);
