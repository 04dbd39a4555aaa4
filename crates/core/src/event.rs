// SPDX-License-Identifier: MIT

//! Run-level events appended to an instance's event log

use crate::run::RunId;
use serde::{Deserialize, Serialize};

/// Severity attached to an event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Events that drive run status transitions.
///
/// Serializes with `{"type": "event:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    /// A run was handed to the queue; an external dequeuer will launch it.
    #[serde(rename = "event:pipeline_enqueued")]
    PipelineEnqueued {
        pipeline_name: String,
        run_id: RunId,
    },
    /// Engine-level bookkeeping message attached to a run.
    #[serde(rename = "event:engine")]
    Engine {
        message: String,
        pipeline_name: String,
        run_id: RunId,
    },
    /// The run reached a failed terminal state.
    #[serde(rename = "event:run_failed")]
    RunFailed { run_id: RunId },
}

impl RunEvent {
    pub fn run_id(&self) -> &RunId {
        match self {
            RunEvent::PipelineEnqueued { run_id, .. } => run_id,
            RunEvent::Engine { run_id, .. } => run_id,
            RunEvent::RunFailed { run_id } => run_id,
        }
    }
}

/// An event plus the metadata recorded alongside it in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEventRecord {
    pub level: EventLevel,
    pub message: String,
    /// Stamped by the recording component's clock.
    pub timestamp_ms: u64,
    pub event: RunEvent,
}

impl RunEventRecord {
    pub fn new(
        event: RunEvent,
        level: EventLevel,
        message: impl Into<String>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp_ms,
            event,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
