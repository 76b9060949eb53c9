//! Phase results, run reports and the coordinator state machine.

use super::summaries::{
    DefaultLedgerValidationSummary, EdgeCaseValidationSummary, IntegrationValidationSummary,
    PerformanceGrade, PerformanceValidationSummary, PersistenceValidationSummary,
    UserExperienceValidationSummary,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::UserId;
use std::fmt;

/// One diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationPhase {
    DefaultLedger,
    Persistence,
    EdgeCases,
    Performance,
    UserExperience,
    Integration,
}

impl ValidationPhase {
    pub const ALL: [ValidationPhase; 6] = [
        ValidationPhase::DefaultLedger,
        ValidationPhase::Persistence,
        ValidationPhase::EdgeCases,
        ValidationPhase::Performance,
        ValidationPhase::UserExperience,
        ValidationPhase::Integration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValidationPhase::DefaultLedger => "default ledger",
            ValidationPhase::Persistence => "state persistence",
            ValidationPhase::EdgeCases => "edge cases",
            ValidationPhase::Performance => "performance",
            ValidationPhase::UserExperience => "user experience",
            ValidationPhase::Integration => "integration",
        }
    }
}

impl fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which phases a run covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunKind {
    /// Every phase.
    Comprehensive,
    /// Default ledger and user experience only.
    Quick,
    /// Performance, user experience and integration.
    Benchmark,
}

impl RunKind {
    pub fn phases(&self) -> &'static [ValidationPhase] {
        match self {
            RunKind::Comprehensive => &ValidationPhase::ALL,
            RunKind::Quick => &[ValidationPhase::DefaultLedger, ValidationPhase::UserExperience],
            RunKind::Benchmark => &[
                ValidationPhase::Performance,
                ValidationPhase::UserExperience,
                ValidationPhase::Integration,
            ],
        }
    }
}

/// Outcome of one phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPhaseResult {
    pub phase: ValidationPhase,
    pub success: bool,
    pub duration_ms: u64,
    /// Error that aborted the phase, or the issues it found.
    pub error_message: Option<String>,
}

/// Release readiness derived from the phase success rate. Informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// Every phase passed.
    ReadyForRelease,
    /// At least 80% passed.
    ReleaseCandidate,
    /// At least 60% passed.
    NeedsFixes,
    NeedsOverhaul,
}

impl Recommendation {
    pub fn from_success_rate(rate: f64) -> Self {
        if rate >= 100.0 {
            Recommendation::ReadyForRelease
        } else if rate >= 80.0 {
            Recommendation::ReleaseCandidate
        } else if rate >= 60.0 {
            Recommendation::NeedsFixes
        } else {
            Recommendation::NeedsOverhaul
        }
    }
}

/// Summaries collected during a run. A phase that errored leaves its slot empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummaries {
    pub default_ledger: Option<DefaultLedgerValidationSummary>,
    pub persistence: Option<PersistenceValidationSummary>,
    pub edge_cases: Option<EdgeCaseValidationSummary>,
    pub performance: Option<PerformanceValidationSummary>,
    pub user_experience: Option<UserExperienceValidationSummary>,
    pub integration: Option<IntegrationValidationSummary>,
}

/// Complete result of one coordinator run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub kind: RunKind,
    pub user_id: UserId,
    pub started_at: DateTime<Utc>,
    pub total_duration_ms: u64,
    pub phases: Vec<ValidationPhaseResult>,
    pub summaries: ValidationSummaries,
    /// Grade of the average phase duration.
    pub performance_grade: PerformanceGrade,
    pub recommendation: Recommendation,
    /// The selection preference was put back as found.
    pub preference_restored: bool,
}

impl ValidationReport {
    pub fn success(&self) -> bool {
        self.phases.iter().all(|p| p.success)
    }

    pub fn passed_count(&self) -> usize {
        self.phases.iter().filter(|p| p.success).count()
    }

    pub fn failed_phases(&self) -> impl Iterator<Item = &ValidationPhaseResult> {
        self.phases.iter().filter(|p| !p.success)
    }

    /// Percentage of phases that passed. An empty run counts as 100%.
    pub fn success_rate(&self) -> f64 {
        if self.phases.is_empty() {
            return 100.0;
        }
        self.passed_count() as f64 * 100.0 / self.phases.len() as f64
    }

    pub fn average_phase_ms(&self) -> u64 {
        if self.phases.is_empty() {
            return 0;
        }
        self.phases.iter().map(|p| p.duration_ms).sum::<u64>() / self.phases.len() as u64
    }
}

/// Coordinator run state. Every run ends in `Completed`.
#[derive(Clone, Debug, PartialEq)]
pub enum CoordinatorState {
    Idle,
    Running {
        phase: ValidationPhase,
        /// Zero-based position within the run.
        index: usize,
        total: usize,
    },
    Completed(Box<ValidationReport>),
}

impl CoordinatorState {
    pub fn is_running(&self) -> bool {
        matches!(self, CoordinatorState::Running { .. })
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            CoordinatorState::Completed(report) => Some(report),
            _ => None,
        }
    }
}
