//! Edge case phase: malformed selections, invalid intents, rapid and
//! concurrent switching, duplicate names.

use super::{elapsed_ms, is_loaded, wait_for_view, INVALID_LEDGER_ID};
use crate::config::ValidationConfig;
use crate::domain::{EdgeCaseValidationSummary, ValidationError};
use crate::target::ValidationTarget;
use lb_01_ledger_resolution::ResolutionError;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Characters a stored id must survive untouched.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(){}[]|\\:;\"'<>,.?/~`";

/// Length of the oversized selection probe.
pub const LONG_ID_LEN: usize = 1000;

pub async fn run(
    target: &ValidationTarget,
    config: &ValidationConfig,
) -> Result<EdgeCaseValidationSummary, ValidationError> {
    let api = target.api();
    let prefs = target.preferences();
    let user_id = target.user_id();
    let mut handled = Vec::new();
    let mut issues = Vec::new();

    let start = Instant::now();
    target.view().load().await;
    wait_for_view(target.view(), config, "view loaded", is_loaded).await?;
    let initialization_time_ms = elapsed_ms(start);

    let default = api.ensure_default_ledger(user_id).await?;

    // Null selection resolves to the default without a write.
    prefs.update_selected_ledger_id(None).await?;
    let effective = api.resolve_effective_ledger(user_id).await?;
    if effective.ledger.id == default.id {
        handled.push("null selection".to_string());
    } else {
        issues.push(format!("null selection resolved to {}", effective.ledger.id));
    }

    // Malformed ids are stored verbatim, then healed on resolve.
    let probes = [
        ("empty id", String::new()),
        ("oversized id", "a".repeat(LONG_ID_LEN)),
        ("special characters", SPECIAL_CHARACTERS.to_string()),
    ];
    for (label, value) in probes {
        prefs.update_selected_ledger_id(Some(value.clone())).await?;
        let stored = prefs.get_ui_preferences().await?.selected_ledger_id;
        if stored.as_deref() != Some(value.as_str()) {
            issues.push(format!("{}: store altered the value", label));
            continue;
        }

        let effective = api.resolve_effective_ledger(user_id).await?;
        let healed = prefs.get_ui_preferences().await?.selected_ledger_id;
        if effective.was_healed() && healed.as_deref() == Some(default.id.as_str()) {
            handled.push(label.to_string());
        } else {
            issues.push(format!("{}: dangling selection was not healed", label));
        }
    }

    // An explicit select of an unknown id is refused without touching the store.
    let before = prefs.get_ui_preferences().await?;
    match api.select_ledger(user_id, INVALID_LEDGER_ID).await {
        Err(ResolutionError::InvalidReference { .. }) => {
            if prefs.get_ui_preferences().await? == before {
                handled.push("invalid select".to_string());
            } else {
                issues.push("invalid select changed the stored preference".to_string());
            }
        }
        Err(e) => return Err(e.into()),
        Ok(ledger) => issues.push(format!("invalid select accepted as {}", ledger.id)),
    }

    let ledgers = api.list_ledgers(user_id).await?;
    if ledgers.len() >= 2 {
        // Rapid switching: the last write is what sticks.
        let mut last = None;
        for i in 0..config.rapid_switch_count {
            let ledger = &ledgers[i % ledgers.len()];
            api.select_ledger(user_id, &ledger.id).await?;
            last = Some(ledger.id.clone());
        }
        let stored = prefs.get_ui_preferences().await?.selected_ledger_id;
        if stored == last {
            handled.push("rapid switching".to_string());
        } else {
            issues.push(format!("rapid switching left {:?}, expected {:?}", stored, last));
        }

        // Concurrent writers: either value may win.
        let (a, b) = (&ledgers[0].id, &ledgers[1].id);
        let (first, second) = tokio::join!(
            api.select_ledger(user_id, a),
            api.select_ledger(user_id, b)
        );
        first?;
        second?;
        let winner = prefs.get_ui_preferences().await?.selected_ledger_id;
        match winner.as_deref() {
            Some(id) if id == a.as_str() || id == b.as_str() => {
                handled.push(format!("concurrent writers (winner {})", id));
            }
            other => issues.push(format!("concurrent writers left {:?}", other)),
        }
    } else {
        debug!("[lb-02] Fewer than two ledgers, skipping switching edge cases");
    }

    let mut names: HashMap<&str, usize> = HashMap::new();
    for ledger in &ledgers {
        *names.entry(ledger.name.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = names
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();
    duplicates.sort_unstable();
    if duplicates.is_empty() {
        handled.push("unique names".to_string());
    } else {
        // Allowed, but worth a look.
        warn!(user_id = %user_id, "[lb-02] Duplicate ledger names: {:?}", duplicates);
        handled.push(format!("duplicate names: {}", duplicates.join(", ")));
    }

    let report = api.check_consistency(user_id).await?;
    issues.extend(report.defects().map(|d| format!("consistency defect: {}", d)));

    Ok(EdgeCaseValidationSummary {
        success: issues.is_empty(),
        initialization_time_ms,
        handled_edge_cases: handled,
        issues,
    })
}
