//! Report output: structured log lines and JSON.

use crate::domain::{PhaseSummary, ValidationError, ValidationReport};
use tracing::{info, warn};

/// Emit one line per phase plus a closing summary.
pub fn log_report(report: &ValidationReport) {
    for phase in &report.phases {
        if phase.success {
            info!(
                phase = %phase.phase,
                duration_ms = phase.duration_ms,
                "[lb-02] Phase passed"
            );
        } else {
            warn!(
                phase = %phase.phase,
                duration_ms = phase.duration_ms,
                error = phase.error_message.as_deref().unwrap_or(""),
                "[lb-02] Phase failed"
            );
        }
    }

    let s = &report.summaries;
    let issue_count: usize = [
        s.default_ledger.as_ref().map(|x| x.issues().len()),
        s.persistence.as_ref().map(|x| x.issues().len()),
        s.edge_cases.as_ref().map(|x| x.issues().len()),
        s.performance.as_ref().map(|x| x.issues().len()),
        s.user_experience.as_ref().map(|x| x.issues().len()),
        s.integration.as_ref().map(|x| x.issues().len()),
    ]
    .iter()
    .flatten()
    .sum();

    info!(
        user_id = %report.user_id,
        kind = ?report.kind,
        passed = report.passed_count(),
        total = report.phases.len(),
        success_rate = report.success_rate(),
        issues = issue_count,
        total_duration_ms = report.total_duration_ms,
        grade = %report.performance_grade,
        recommendation = ?report.recommendation,
        "[lb-02] Validation completed"
    );
}

impl ValidationReport {
    pub fn to_json(&self) -> Result<String, ValidationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable multi-line summary for terminals.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{:?} validation for {}: {}/{} phases passed ({:.1}%), grade {}, {:?}\n",
            self.kind,
            self.user_id,
            self.passed_count(),
            self.phases.len(),
            self.success_rate(),
            self.performance_grade,
            self.recommendation
        );
        for phase in &self.phases {
            let mark = if phase.success { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "  [{}] {:<18} {:>6}ms",
                mark,
                phase.phase.name(),
                phase.duration_ms
            ));
            if let Some(message) = &phase.error_message {
                out.push_str(&format!("  {}", message));
            }
            out.push('\n');
        }
        out
    }
}
