//! Default ledger phase: existence, idempotent creation, display order.

use crate::domain::{DefaultLedgerValidationSummary, ValidationError};
use crate::target::ValidationTarget;
use tracing::debug;

pub async fn run(target: &ValidationTarget) -> Result<DefaultLedgerValidationSummary, ValidationError> {
    let api = target.api();
    let user_id = target.user_id();
    let mut issues = Vec::new();

    let first = api.ensure_default_ledger(user_id).await?;
    let second = api.ensure_default_ledger(user_id).await?;
    if first.id != second.id {
        issues.push(format!(
            "ensure_default_ledger returned {} then {}",
            first.id, second.id
        ));
    }

    let ledgers = api.list_ledgers(user_id).await?;
    let default_count = ledgers.iter().filter(|l| l.is_default).count();
    if default_count != 1 {
        issues.push(format!("expected one default ledger, found {}", default_count));
    }
    match ledgers.first() {
        Some(head) if head.is_default => {}
        Some(head) => issues.push(format!("ledger {} sorts before the default", head.id)),
        None => issues.push("no ledgers listed after ensure_default_ledger".to_string()),
    }

    let report = api.check_consistency(user_id).await?;
    issues.extend(report.defects().map(|d| format!("consistency defect: {}", d)));

    let effective = api.resolve_effective_ledger(user_id).await?;
    debug!(
        "[lb-02] Default ledger phase: {} ledgers, effective {}",
        ledgers.len(),
        effective.ledger.id
    );

    Ok(DefaultLedgerValidationSummary {
        success: issues.is_empty(),
        ledger_count: ledgers.len(),
        has_default_ledger: default_count > 0,
        default_ledger_selected: effective.ledger.is_default,
        default_ledger_name: Some(first.name),
        issues,
    })
}
