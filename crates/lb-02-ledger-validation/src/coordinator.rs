//! # Validation Coordinator
//!
//! Runs phases in order and aggregates them into a `ValidationReport`.
//!
//! State machine per run, published on a `watch` channel:
//!
//! ```text
//! Idle -> Running(phase 0) -> ... -> Running(phase n) -> Completed(report)
//! ```
//!
//! A failing phase is recorded and the run moves on. Phases are never
//! retried. The selection preference is snapshotted before the first phase
//! and written back after the last.

use crate::checks;
use crate::config::ValidationConfig;
use crate::domain::{
    CoordinatorState, PerformanceGrade, PhaseSummary, Recommendation, RunKind, ValidationError,
    ValidationPhase, ValidationPhaseResult, ValidationReport, ValidationSummaries,
};
use crate::report::log_report;
use crate::target::ValidationTarget;
use chrono::Utc;
use shared_types::UiPreferences;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct ValidationCoordinator {
    target: ValidationTarget,
    config: ValidationConfig,
    state: watch::Sender<CoordinatorState>,
}

impl ValidationCoordinator {
    pub fn new(target: ValidationTarget) -> Self {
        Self::with_config(target, ValidationConfig::default())
    }

    pub fn with_config(target: ValidationTarget, config: ValidationConfig) -> Self {
        let (state, _rx) = watch::channel(CoordinatorState::Idle);
        Self {
            target,
            config,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Every phase.
    pub async fn run_comprehensive(&self) -> ValidationReport {
        self.run(RunKind::Comprehensive).await
    }

    /// Default ledger and user experience.
    pub async fn run_quick(&self) -> ValidationReport {
        self.run(RunKind::Quick).await
    }

    /// Performance, user experience and integration.
    pub async fn run_benchmark(&self) -> ValidationReport {
        self.run(RunKind::Benchmark).await
    }

    pub async fn run(&self, kind: RunKind) -> ValidationReport {
        let phases = kind.phases();
        let started_at = Utc::now();
        let start = Instant::now();
        info!(
            user_id = %self.target.user_id(),
            "[lb-02] Starting {:?} validation ({} phases)",
            kind,
            phases.len()
        );

        let snapshot = match self.target.preferences().get_ui_preferences().await {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                warn!("[lb-02] Could not snapshot selection preference: {}", e);
                None
            }
        };

        let mut summaries = ValidationSummaries::default();
        let mut results = Vec::with_capacity(phases.len());
        for (index, phase) in phases.iter().copied().enumerate() {
            self.state.send_replace(CoordinatorState::Running {
                phase,
                index,
                total: phases.len(),
            });
            results.push(self.run_phase(phase, &mut summaries).await);
        }

        let preference_restored = match snapshot {
            Some(prefs) => self.restore(prefs).await,
            None => false,
        };

        let mut report = ValidationReport {
            kind,
            user_id: self.target.user_id().to_string(),
            started_at,
            total_duration_ms: checks::elapsed_ms(start),
            phases: results,
            summaries,
            performance_grade: PerformanceGrade::A,
            recommendation: Recommendation::ReadyForRelease,
            preference_restored,
        };
        report.performance_grade = PerformanceGrade::from_average_ms(
            report.average_phase_ms(),
            &self.config.grade_thresholds_ms,
        );
        report.recommendation = Recommendation::from_success_rate(report.success_rate());

        log_report(&report);
        self.state
            .send_replace(CoordinatorState::Completed(Box::new(report.clone())));
        report
    }

    async fn run_phase(
        &self,
        phase: ValidationPhase,
        summaries: &mut ValidationSummaries,
    ) -> ValidationPhaseResult {
        debug!("[lb-02] Phase {} started", phase);
        let start = Instant::now();
        let target = &self.target;
        let config = &self.config;

        let (success, error_message) = match phase {
            ValidationPhase::DefaultLedger => {
                record(checks::default_ledger::run(target).await, &mut summaries.default_ledger)
            }
            ValidationPhase::Persistence => record(
                checks::persistence::run(target, config).await,
                &mut summaries.persistence,
            ),
            ValidationPhase::EdgeCases => record(
                checks::edge_cases::run(target, config).await,
                &mut summaries.edge_cases,
            ),
            ValidationPhase::Performance => record(
                checks::performance::run(target, config).await,
                &mut summaries.performance,
            ),
            ValidationPhase::UserExperience => record(
                checks::user_experience::run(target, config).await,
                &mut summaries.user_experience,
            ),
            ValidationPhase::Integration => record(
                checks::integration::run(target, config).await,
                &mut summaries.integration,
            ),
        };

        let duration_ms = checks::elapsed_ms(start);
        if success {
            debug!("[lb-02] Phase {} passed in {}ms", phase, duration_ms);
        } else {
            warn!(
                "[lb-02] Phase {} failed in {}ms: {}",
                phase,
                duration_ms,
                error_message.as_deref().unwrap_or("unknown")
            );
        }

        ValidationPhaseResult {
            phase,
            success,
            duration_ms,
            error_message,
        }
    }

    async fn restore(&self, prefs: UiPreferences) -> bool {
        match self
            .target
            .preferences()
            .update_selected_ledger_id(prefs.selected_ledger_id)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("[lb-02] Could not restore selection preference: {}", e);
                false
            }
        }
    }
}

/// Store the summary and reduce it to (success, message).
fn record<S: PhaseSummary>(
    result: Result<S, ValidationError>,
    slot: &mut Option<S>,
) -> (bool, Option<String>) {
    match result {
        Ok(summary) => {
            let success = summary.success();
            let message = (!summary.issues().is_empty()).then(|| summary.issues().join("; "));
            *slot = Some(summary);
            (success, message)
        }
        Err(e) => (false, Some(e.to_string())),
    }
}
