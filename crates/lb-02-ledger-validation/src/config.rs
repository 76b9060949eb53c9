//! Configuration for Ledger Validation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Validation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Polls while waiting for the view state to settle
    pub settle_attempts: u32,
    /// Pause between settle polls (milliseconds)
    pub settle_interval_ms: u64,
    /// Write/read-back cycles in the persistence phase
    pub read_write_cycles: usize,
    /// Back-to-back switches in the rapid-switching edge case
    pub rapid_switch_count: usize,
    /// Average phase duration bounds for grades A..D (milliseconds)
    pub grade_thresholds_ms: [u64; 4],
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            settle_attempts: 100,
            settle_interval_ms: 10,
            read_write_cycles: 10,
            rapid_switch_count: 10,
            grade_thresholds_ms: [1_000, 3_000, 5_000, 10_000],
        }
    }
}

impl ValidationConfig {
    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    /// Upper bound on how long a settle wait may take.
    pub fn settle_budget(&self) -> Duration {
        self.settle_interval() * self.settle_attempts
    }
}
