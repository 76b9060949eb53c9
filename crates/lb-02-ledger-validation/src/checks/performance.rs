//! Performance phase: view initialization, ledger switching, memory.
//!
//! Timings depend on the environment. They feed the grade and raise issues
//! only past generous bounds.

use super::{elapsed_ms, is_loaded, other_ledger, wait_for_view};
use crate::config::ValidationConfig;
use crate::domain::{PerformanceGrade, PerformanceValidationSummary, ValidationError};
use crate::target::ValidationTarget;
use lb_01_ledger_resolution::StateDescription;
use std::time::Instant;
use tracing::debug;

pub async fn run(
    target: &ValidationTarget,
    config: &ValidationConfig,
) -> Result<PerformanceValidationSummary, ValidationError> {
    let view = target.view();
    let mut issues = Vec::new();

    let start = Instant::now();
    view.load().await;
    let state = wait_for_view(view, config, "view loaded", is_loaded).await?;
    let initialization_time_ms = elapsed_ms(start);
    match initialization_time_ms {
        ms if ms > 5_000 => issues.push(format!("initialization took {}ms", ms)),
        ms if ms > 2_000 => issues.push(format!("initialization slow ({}ms)", ms)),
        _ => {}
    }

    let mut switching_time_ms = None;
    if let Some(next) = other_ledger(&state) {
        let start = Instant::now();
        view.select_ledger(&next.id).await;
        wait_for_view(view, config, "switched ledger shown", |s| {
            s.selected_ledger_id() == Some(next.id.as_str()) && !s.is_loading()
        })
        .await?;
        let ms = elapsed_ms(start);
        switching_time_ms = Some(ms);
        match ms {
            ms if ms > 3_000 => issues.push(format!("ledger switch took {}ms", ms)),
            ms if ms > 1_000 => issues.push(format!("ledger switch slow ({}ms)", ms)),
            _ => {}
        }
    }

    let memory_usage_mb = resident_memory_mb();
    match memory_usage_mb {
        Some(mb) if mb > 150 => issues.push(format!("memory usage high ({}MB)", mb)),
        Some(mb) if mb > 100 => issues.push(format!("memory usage elevated ({}MB)", mb)),
        _ => {}
    }

    let performance_grade = grade(initialization_time_ms, switching_time_ms, memory_usage_mb);
    debug!(
        "[lb-02] Performance phase: init {}ms, switch {:?}ms, memory {:?}MB, grade {}",
        initialization_time_ms, switching_time_ms, memory_usage_mb, performance_grade
    );

    Ok(PerformanceValidationSummary {
        success: issues.is_empty(),
        initialization_time_ms,
        switching_time_ms,
        memory_usage_mb,
        performance_grade,
        issues,
    })
}

/// Deduct from 100 per slow measurement, then map to a letter.
pub fn grade(init_ms: u64, switch_ms: Option<u64>, memory_mb: Option<u64>) -> PerformanceGrade {
    let mut score = 100;

    score -= match init_ms {
        ms if ms > 5_000 => 30,
        ms if ms > 2_000 => 15,
        ms if ms > 1_000 => 5,
        _ => 0,
    };
    score -= match switch_ms.unwrap_or(0) {
        ms if ms > 3_000 => 25,
        ms if ms > 1_000 => 10,
        ms if ms > 500 => 5,
        _ => 0,
    };
    score -= match memory_mb.unwrap_or(0) {
        mb if mb > 150 => 20,
        mb if mb > 100 => 10,
        mb if mb > 80 => 5,
        _ => 0,
    };

    PerformanceGrade::from_score(score)
}

/// Resident set size from `/proc/self/status`; `None` off Linux.
fn resident_memory_mb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb / 1024)
}
