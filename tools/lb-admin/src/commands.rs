//! Command execution against the JSON-file stores.

use crate::cli::{Cli, Command, CreateArgs, ValidateArgs};
use crate::error::AdminError;
use lb_01_ledger_resolution::adapters::{JsonFileLedgerRepository, JsonFilePreferenceStore};
use lb_01_ledger_resolution::{
    ConsistencyReport, DefaultLedgerService, LedgerResolutionApi, NewLedger, PreferenceStore,
};
use lb_02_ledger_validation::{RunKind, ValidationCoordinator, ValidationTarget};
use ledger_telemetry::{log_event, log_ledger_event};
use serde::Serialize;
use shared_types::Ledger;
use std::sync::Arc;

const SUBSYSTEM: &str = "lb-admin";

/// Rendered command output plus whether the process should exit cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }
}

type FileService = DefaultLedgerService<JsonFileLedgerRepository, JsonFilePreferenceStore>;

pub async fn execute(cli: &Cli) -> Result<Outcome, AdminError> {
    let repository = Arc::new(JsonFileLedgerRepository::new(&cli.data_dir));
    let preferences = Arc::new(JsonFilePreferenceStore::open(&cli.data_dir)?);
    let service = Arc::new(DefaultLedgerService::new(repository, preferences));
    let user = cli.user.as_str();
    let json = cli.json;

    match &cli.command {
        Command::Ensure => {
            let ledger = service.ensure_default_ledger(user).await?;
            log_ledger_event!(info, SUBSYSTEM, "Default ledger ensured", user, ledger.id);
            render(json, &ledger, || format!("default ledger: {}", describe(&ledger)))
        }
        Command::List => list(&service, user, json).await,
        Command::Resolve => {
            let effective = service.resolve_effective_ledger(user).await?;
            render(json, &effective, || {
                let mut text = format!("effective ledger: {}", describe(&effective.ledger));
                if effective.was_healed() {
                    text.push_str(" (stale selection replaced)");
                }
                text
            })
        }
        Command::Select { ledger_id } => {
            let ledger = service.select_ledger(user, ledger_id).await?;
            log_ledger_event!(info, SUBSYSTEM, "Ledger selected", user, ledger.id);
            render(json, &ledger, || format!("selected {}", describe(&ledger)))
        }
        Command::Create(args) => create(&service, user, args, json).await,
        Command::SetDefault { ledger_id } => {
            let ledger = service.set_default_ledger(user, ledger_id).await?;
            log_ledger_event!(info, SUBSYSTEM, "Default ledger changed", user, ledger.id);
            render(json, &ledger, || format!("default is now {}", describe(&ledger)))
        }
        Command::Delete { ledger_id } => {
            service.delete_ledger(user, ledger_id).await?;
            log_ledger_event!(info, SUBSYSTEM, "Ledger deleted", user, ledger_id);
            let selected = service.preferences().get_ui_preferences().await?.selected_ledger_id;
            let body = serde_json::json!({ "deleted": ledger_id, "selected_ledger_id": selected });
            render(json, &body, || format!("deleted {}", ledger_id))
        }
        Command::Check => {
            let report = service.check_consistency(user).await?;
            let success = report.violations.is_empty();
            if !success {
                log_event!(
                    warn,
                    SUBSYSTEM,
                    "Consistency violations found",
                    user_id = %user,
                    violations = report.violations.len()
                );
            }
            let output = render(json, &report, || check_text(&report))?.output;
            Ok(Outcome { output, success })
        }
        Command::Validate(args) => validate(service, user, *args, json).await,
    }
}

async fn list(service: &FileService, user: &str, json: bool) -> Result<Outcome, AdminError> {
    let ledgers = service.list_ledgers(user).await?;
    let selected = service.preferences().get_ui_preferences().await?.selected_ledger_id;
    render(json, &ledgers, || {
        if ledgers.is_empty() {
            return format!(
                "no ledgers (`ensure` creates {:?})",
                service.config().default_name
            );
        }
        ledgers
            .iter()
            .map(|l| {
                let default = if l.is_default { '*' } else { ' ' };
                let current = if selected.as_deref() == Some(l.id.as_str()) { '>' } else { ' ' };
                format!(
                    "{}{} {:<36}  {:<20}  order={}",
                    default, current, l.id, l.name, l.display_order
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn create(
    service: &FileService,
    user: &str,
    args: &CreateArgs,
    json: bool,
) -> Result<Outcome, AdminError> {
    let draft = NewLedger::named(&args.name)
        .with_icon(&args.icon)
        .with_color(&args.color)
        .with_description(&args.description);
    let ledger = service.create_ledger(user, draft).await?;
    log_ledger_event!(
        info,
        SUBSYSTEM,
        "Ledger created",
        user,
        ledger.id,
        is_default = ledger.is_default
    );
    render(json, &ledger, || format!("created {}", describe(&ledger)))
}

async fn validate(
    service: Arc<FileService>,
    user: &str,
    args: ValidateArgs,
    json: bool,
) -> Result<Outcome, AdminError> {
    let kind = if args.quick {
        RunKind::Quick
    } else if args.benchmark {
        RunKind::Benchmark
    } else {
        RunKind::Comprehensive
    };

    let preferences = service.preferences().clone();
    let target = ValidationTarget::new(user, service, preferences);
    let report = ValidationCoordinator::new(target).run(kind).await;
    log_event!(
        info,
        SUBSYSTEM,
        "Validation finished",
        user_id = %user,
        passed = report.passed_count(),
        total = report.phases.len()
    );

    let output = if json {
        report.to_json()?
    } else {
        report.render_text()
    };
    Ok(Outcome {
        output,
        success: report.success(),
    })
}

fn render<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<Outcome, AdminError> {
    if json {
        Ok(Outcome::ok(serde_json::to_string_pretty(value)?))
    } else {
        Ok(Outcome::ok(text()))
    }
}

fn describe(ledger: &Ledger) -> String {
    let default = if ledger.is_default { ", default" } else { "" };
    format!("{} ({}{})", ledger.name, ledger.id, default)
}

fn check_text(report: &ConsistencyReport) -> String {
    let mut text = format!(
        "user {}: {} ledgers, {} default, selected {:?}",
        report.user_id, report.ledger_count, report.default_count, report.selected_ledger_id
    );
    if report.violations.is_empty() {
        text.push_str("\nconsistent");
    }
    for violation in &report.violations {
        let severity = if violation.is_defect() { "defect" } else { "recoverable" };
        text.push_str(&format!("\n[{}] {}", severity, violation));
    }
    text
}
