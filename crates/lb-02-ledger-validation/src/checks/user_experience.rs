//! User experience phase: loading state, error handling, responsiveness.

use super::{elapsed_ms, is_loaded, other_ledger, wait_for_view, INVALID_LEDGER_ID};
use crate::config::ValidationConfig;
use crate::domain::{PerformanceGrade, Rating, UserExperienceValidationSummary, ValidationError};
use crate::target::ValidationTarget;
use lb_01_ledger_resolution::StateDescription;
use std::time::Instant;
use tracing::debug;

pub async fn run(
    target: &ValidationTarget,
    config: &ValidationConfig,
) -> Result<UserExperienceValidationSummary, ValidationError> {
    let view = target.view();
    let mut issues = Vec::new();

    let start = Instant::now();
    let loaded = view.load().await;
    if loaded.is_loading() {
        issues.push("view still loading after load returned".to_string());
    }
    let state = wait_for_view(view, config, "view loaded", is_loaded).await?;
    let init_ms = elapsed_ms(start);
    let loading_state_management = Rating::from_elapsed_ms(init_ms, [1_000, 3_000, 5_000]);
    if init_ms > 5_000 {
        issues.push(format!("initialization took {}ms", init_ms));
    }

    let before = state.current_ledger().map(|l| l.id.clone());
    let after_invalid = view.select_ledger(INVALID_LEDGER_ID).await;
    let error_handling = if after_invalid.selected_ledger_id() == Some(INVALID_LEDGER_ID) {
        issues.push("view accepted an invalid ledger id".to_string());
        Rating::Poor
    } else if after_invalid.last_error().is_some()
        && after_invalid.current_ledger().map(|l| l.id.clone()) == before
    {
        Rating::Excellent
    } else {
        Rating::Good
    };

    let interaction_responsiveness = match other_ledger(&after_invalid) {
        Some(next) => {
            let start = Instant::now();
            view.select_ledger(&next.id).await;
            wait_for_view(view, config, "switched ledger shown", |s| {
                s.selected_ledger_id() == Some(next.id.as_str())
            })
            .await?;
            Rating::from_elapsed_ms(elapsed_ms(start), [300, 1_000, 3_000])
        }
        None => Rating::NotMeasured,
    };

    let overall_rating = overall(&[
        loading_state_management,
        error_handling,
        interaction_responsiveness,
    ]);
    debug!(
        "[lb-02] User experience phase: loading {}, errors {}, responsiveness {}, overall {}",
        loading_state_management, error_handling, interaction_responsiveness, overall_rating
    );

    Ok(UserExperienceValidationSummary {
        success: issues.is_empty(),
        loading_state_management,
        error_handling,
        interaction_responsiveness,
        overall_rating,
        issues,
    })
}

/// Average of the measured ratings, graded. Nothing measured grades F.
pub fn overall(ratings: &[Rating]) -> PerformanceGrade {
    let points: Vec<i32> = ratings.iter().filter_map(Rating::points).collect();
    if points.is_empty() {
        return PerformanceGrade::F;
    }
    PerformanceGrade::from_score(points.iter().sum::<i32>() / points.len() as i32)
}
