//! Integration phase: the view agrees with the backend and rejects bad input.

use super::{is_loaded, wait_for_view};
use crate::config::ValidationConfig;
use crate::domain::{IntegrationValidationSummary, PerformanceGrade, ValidationError};
use crate::target::ValidationTarget;
use lb_01_ledger_resolution::StateDescription;
use tracing::debug;

const INVALID_PROBE_ID: &str = "invalid-ledger-id";

pub async fn run(
    target: &ValidationTarget,
    config: &ValidationConfig,
) -> Result<IntegrationValidationSummary, ValidationError> {
    let api = target.api();
    let view = target.view();
    let user_id = target.user_id();
    let mut issues = Vec::new();
    let mut module_score = 100;
    let mut data_score = 100;
    let mut error_score = 100;

    view.refresh().await;
    let state = wait_for_view(view, config, "view loaded", is_loaded).await?;
    let backend = api.list_ledgers(user_id).await?;

    if state.ledgers().len() != backend.len() {
        issues.push(format!(
            "view lists {} ledgers, backend {}",
            state.ledgers().len(),
            backend.len()
        ));
        data_score -= 20;
    }
    let stale = state
        .ledgers()
        .iter()
        .filter(|shown| !backend.iter().any(|b| b.id == shown.id && b.name == shown.name))
        .count();
    if stale > 0 {
        issues.push(format!("{} ledgers in the view differ from the backend", stale));
        data_score -= 15;
    }

    if state.is_loading() && !state.ledgers().is_empty() {
        issues.push("view is loading while already showing ledgers".to_string());
        module_score -= 15;
    }
    if !state.is_coherent() {
        issues.push("current ledger does not match the selected id".to_string());
        data_score -= 25;
    }

    let report = api.check_consistency(user_id).await?;
    if !report.is_consistent() {
        issues.extend(report.defects().map(|d| format!("consistency defect: {}", d)));
        data_score -= 25;
    }

    let after = view.select_ledger(INVALID_PROBE_ID).await;
    if after.selected_ledger_id() == Some(INVALID_PROBE_ID) {
        issues.push("view accepted an invalid ledger id".to_string());
        error_score -= 30;
    }
    let stored = target.preferences().get_ui_preferences().await?;
    if stored.selected_ledger_id.as_deref() == Some(INVALID_PROBE_ID) {
        issues.push("invalid ledger id reached the preference store".to_string());
        error_score -= 30;
    }

    let overall_integration_rating =
        PerformanceGrade::from_score((module_score + data_score + error_score) / 3);
    debug!(
        "[lb-02] Integration phase: module {}, data {}, errors {}, rating {}",
        module_score, data_score, error_score, overall_integration_rating
    );

    Ok(IntegrationValidationSummary {
        success: issues.is_empty(),
        module_integration_score: module_score,
        data_consistency_score: data_score,
        error_handling_score: error_score,
        overall_integration_rating,
        issues,
    })
}
