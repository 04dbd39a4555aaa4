// SPDX-License-Identifier: MIT

//! Pipeline run identity and lifecycle states

use crate::define_id;
use serde::{Deserialize, Serialize};

define_id! {
    /// Unique identifier for a pipeline run.
    pub struct RunId;
}

impl RunId {
    /// Mint a fresh random run id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Lifecycle status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created but not yet submitted to a coordinator
    NotStarted,
    /// Waiting in the coordinator queue for the dequeuer
    Queued,
    /// Picked up by a launcher and executing
    Started,
    Success,
    Failure,
    Canceled,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Failure | RunStatus::Canceled)
    }
}

/// A single run of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    pub run_id: RunId,
    pub pipeline_name: String,
    pub status: RunStatus,
}

impl PipelineRun {
    /// Create a run in the `NotStarted` state.
    pub fn new(run_id: RunId, pipeline_name: impl Into<String>) -> Self {
        Self {
            run_id,
            pipeline_name: pipeline_name.into(),
            status: RunStatus::NotStarted,
        }
    }

    pub fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
