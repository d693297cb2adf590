//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background quota replenishment worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the replenishment task is spawned.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval between sweeps in hours, after the first midnight run.
    #[serde(default = "default_interval")]
    pub interval_hours: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_hours: default_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    24
}
