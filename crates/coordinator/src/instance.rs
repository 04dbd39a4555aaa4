// SPDX-License-Identifier: MIT

//! The shared instance: run table, event log, launcher, and clock

use parking_lot::RwLock;
use skein_core::{
    Clock, EventLevel, PipelineRun, RunEvent, RunEventRecord, RunId, RunStatus, SystemClock,
};
use std::collections::HashMap;

/// Decides whether and how already-launched runs can be terminated.
/// Implemented by the process that actually launches runs.
pub trait RunLauncher: Send + Sync {
    fn can_terminate(&self, run_id: &RunId) -> bool;
    fn terminate(&self, run_id: &RunId) -> bool;
}

/// A launcher that never claims any run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLauncher;

impl RunLauncher for NoopLauncher {
    fn can_terminate(&self, _run_id: &RunId) -> bool {
        false
    }

    fn terminate(&self, _run_id: &RunId) -> bool {
        false
    }
}

/// Run storage and event log shared between the coordinator and the
/// external dequeuer. Status transitions are driven by events appended
/// through [`Instance::handle_new_event`], so the log and the run table
/// stay consistent.
pub struct Instance {
    runs: RwLock<HashMap<RunId, PipelineRun>>,
    event_log: RwLock<Vec<RunEventRecord>>,
    launcher: Box<dyn RunLauncher>,
    clock: Box<dyn Clock>,
}

impl Instance {
    pub fn new(launcher: Box<dyn RunLauncher>, clock: Box<dyn Clock>) -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
            event_log: RwLock::new(Vec::new()),
            launcher,
            clock,
        }
    }

    /// An instance with no launcher and the system clock.
    pub fn in_memory() -> Self {
        Self::new(Box::new(NoopLauncher), Box::new(SystemClock))
    }

    pub fn run_launcher(&self) -> &dyn RunLauncher {
        self.launcher.as_ref()
    }

    pub fn epoch_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    pub fn add_run(&self, run: PipelineRun) {
        self.runs.write().insert(run.run_id.clone(), run);
    }

    pub fn get_run_by_id(&self, run_id: &RunId) -> Option<PipelineRun> {
        self.runs.read().get(run_id).cloned()
    }

    /// Append an event record and apply its status transition to the run
    /// it names (enqueued -> Queued, run-failed -> Failure).
    pub fn handle_new_event(&self, record: RunEventRecord) {
        let transition = match &record.event {
            RunEvent::PipelineEnqueued { .. } => Some(RunStatus::Queued),
            RunEvent::RunFailed { .. } => Some(RunStatus::Failure),
            RunEvent::Engine { .. } => None,
        };
        if let Some(status) = transition {
            let mut runs = self.runs.write();
            if let Some(run) = runs.get_mut(record.event.run_id()) {
                run.status = status;
            }
        }
        self.event_log.write().push(record);
    }

    /// Record an engine-level bookkeeping message against `run`.
    pub fn report_engine_event(&self, message: impl Into<String>, run: &PipelineRun) {
        let message = message.into();
        self.handle_new_event(RunEventRecord::new(
            RunEvent::Engine {
                message: message.clone(),
                pipeline_name: run.pipeline_name.clone(),
                run_id: run.run_id.clone(),
            },
            EventLevel::Info,
            message,
            self.epoch_ms(),
        ));
    }

    /// Move `run` to the failed terminal state via the event log.
    pub fn report_run_failed(&self, run: &PipelineRun) {
        self.handle_new_event(RunEventRecord::new(
            RunEvent::RunFailed {
                run_id: run.run_id.clone(),
            },
            EventLevel::Error,
            format!("Run {} failed.", run.run_id),
            self.epoch_ms(),
        ));
    }

    pub fn events_for_run(&self, run_id: &RunId) -> Vec<RunEventRecord> {
        self.event_log
            .read()
            .iter()
            .filter(|record| record.event.run_id() == run_id)
            .cloned()
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.event_log.read().len()
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
