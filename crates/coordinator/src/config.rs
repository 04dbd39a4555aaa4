// SPDX-License-Identifier: MIT

//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_CONCURRENT_RUNS: usize = 10;
pub const DEFAULT_DEQUEUE_INTERVAL_SECONDS: u64 = 5;

/// Tuning knobs for the queued run coordinator. Both fields are optional
/// in the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedCoordinatorConfig {
    /// Upper bound on runs the dequeuer may have in flight at once.
    #[serde(default = "default_max_concurrent_runs")]
    pub max_concurrent_runs: usize,
    /// How often the external dequeuer polls the queue.
    #[serde(default = "default_dequeue_interval_seconds")]
    pub dequeue_interval_seconds: u64,
}

fn default_max_concurrent_runs() -> usize {
    DEFAULT_MAX_CONCURRENT_RUNS
}

fn default_dequeue_interval_seconds() -> u64 {
    DEFAULT_DEQUEUE_INTERVAL_SECONDS
}

impl Default for QueuedCoordinatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: DEFAULT_MAX_CONCURRENT_RUNS,
            dequeue_interval_seconds: DEFAULT_DEQUEUE_INTERVAL_SECONDS,
        }
    }
}

impl QueuedCoordinatorConfig {
    pub fn dequeue_interval(&self) -> Duration {
        Duration::from_secs(self.dequeue_interval_seconds)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
