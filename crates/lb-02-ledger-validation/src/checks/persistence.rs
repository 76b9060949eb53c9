//! State persistence phase: writes survive read-back and the view restores
//! the stored selection.

use super::{is_loaded, wait_for_view};
use crate::config::ValidationConfig;
use crate::domain::{PersistenceValidationSummary, ValidationError};
use crate::target::ValidationTarget;
use lb_01_ledger_resolution::{SelectionSource, StateDescription};
use tracing::debug;

pub async fn run(
    target: &ValidationTarget,
    config: &ValidationConfig,
) -> Result<PersistenceValidationSummary, ValidationError> {
    let api = target.api();
    let prefs = target.preferences();
    let user_id = target.user_id();
    let mut issues = Vec::new();

    let initial_ledger_id = prefs.get_ui_preferences().await?.selected_ledger_id;
    api.ensure_default_ledger(user_id).await?;
    let ledgers = api.list_ledgers(user_id).await?;

    // Prefer a ledger other than the current selection so the switch is visible.
    let preferred = ledgers
        .iter()
        .find(|l| Some(&l.id) != initial_ledger_id.as_ref())
        .or_else(|| ledgers.first())
        .cloned();
    let Some(preferred) = preferred else {
        issues.push("user has no ledgers to select".to_string());
        return Ok(PersistenceValidationSummary {
            success: false,
            initial_ledger_id,
            preferred_ledger_id: None,
            state_restored_correctly: false,
            issues,
        });
    };

    api.select_ledger(user_id, &preferred.id).await?;
    let stored = prefs.get_ui_preferences().await?.selected_ledger_id;
    if stored.as_deref() != Some(preferred.id.as_str()) {
        issues.push(format!(
            "selected {} but store holds {:?}",
            preferred.id, stored
        ));
    }

    let mut mismatches = 0;
    for cycle in 0..config.read_write_cycles {
        let ledger = &ledgers[cycle % ledgers.len()];
        prefs.update_selected_ledger_id(Some(ledger.id.clone())).await?;
        let read_back = prefs.get_ui_preferences().await?.selected_ledger_id;
        if read_back.as_deref() != Some(ledger.id.as_str()) {
            mismatches += 1;
        }
    }
    if mismatches > 0 {
        issues.push(format!(
            "{} of {} read-back cycles returned a different value",
            mismatches, config.read_write_cycles
        ));
    }

    // Restore through a fresh load, as on start-up.
    api.select_ledger(user_id, &preferred.id).await?;
    target.view().load().await;
    let state = wait_for_view(target.view(), config, "view loaded after restart", is_loaded).await?;
    let state_restored_correctly = state.current_ledger().map(|l| l.id.as_str())
        == Some(preferred.id.as_str())
        && state.selected_ledger_id() == Some(preferred.id.as_str());
    if !state_restored_correctly {
        issues.push(format!(
            "view restored {:?} instead of {}",
            state.current_ledger().map(|l| &l.id),
            preferred.id
        ));
    }

    // A cleared preference must fall back to the default.
    prefs.update_selected_ledger_id(None).await?;
    let effective = api.resolve_effective_ledger(user_id).await?;
    if effective.source != SelectionSource::DefaultForEmptySelection || !effective.ledger.is_default {
        issues.push("cleared preference did not resolve to the default ledger".to_string());
    }

    debug!(
        "[lb-02] Persistence phase: preferred {}, restored {}",
        preferred.id, state_restored_correctly
    );

    Ok(PersistenceValidationSummary {
        success: issues.is_empty(),
        initial_ledger_id,
        preferred_ledger_id: Some(preferred.id),
        state_restored_correctly,
        issues,
    })
}
