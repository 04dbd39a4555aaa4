// SPDX-License-Identifier: MIT

//! Queue-backed run coordinator.
//!
//! Submitting a run appends a `pipeline_enqueued` event to the instance's
//! shared run storage; an external dequeuer process picks queued runs up
//! and launches them. The coordinator holds only a weak back-reference to
//! the instance to avoid an ownership cycle.

use crate::config::QueuedCoordinatorConfig;
use crate::error::CoordinatorError;
use crate::instance::Instance;
use skein_core::{EventLevel, PipelineRun, RunEvent, RunEventRecord, RunId, RunStatus};
use std::sync::{Arc, Weak};
use tracing::info;

pub struct QueuedRunCoordinator {
    instance: Weak<Instance>,
    config: QueuedCoordinatorConfig,
}

impl QueuedRunCoordinator {
    pub fn new(instance: &Arc<Instance>, config: QueuedCoordinatorConfig) -> Self {
        Self {
            instance: Arc::downgrade(instance),
            config,
        }
    }

    pub fn config(&self) -> &QueuedCoordinatorConfig {
        &self.config
    }

    /// Upgrade the weak back-reference. A dead reference means the
    /// coordinator outlived its instance, which is a programmer error.
    fn instance(&self) -> Result<Arc<Instance>, CoordinatorError> {
        self.instance.upgrade().ok_or(CoordinatorError::InstanceGone)
    }

    /// Hand a `NotStarted` run to the queue. Emits exactly one enqueued
    /// event, stamped by the instance clock, and returns the run
    /// unchanged; the actual dequeue happens in a separate process.
    pub fn submit_run(&self, run: PipelineRun) -> Result<PipelineRun, CoordinatorError> {
        let instance = self.instance()?;
        if run.status != RunStatus::NotStarted {
            return Err(CoordinatorError::InvalidSubmission {
                run_id: run.run_id.clone(),
                status: run.status,
            });
        }

        instance.handle_new_event(RunEventRecord::new(
            RunEvent::PipelineEnqueued {
                pipeline_name: run.pipeline_name.clone(),
                run_id: run.run_id.clone(),
            },
            EventLevel::Info,
            "",
            instance.epoch_ms(),
        ));
        info!(run_id = %run.run_id, pipeline = %run.pipeline_name, "run enqueued");

        Ok(run)
    }

    /// Whether `cancel_run` could take effect right now: queued runs are
    /// always cancellable, launched runs defer to the launcher. Missing
    /// runs yield false.
    pub fn can_cancel_run(&self, run_id: &RunId) -> Result<bool, CoordinatorError> {
        let instance = self.instance()?;
        match instance.get_run_by_id(run_id) {
            None => Ok(false),
            Some(run) if run.status == RunStatus::Queued => Ok(true),
            Some(_) => Ok(instance.run_launcher().can_terminate(run_id)),
        }
    }

    /// Cancel a run. Queued runs are failed directly with an engine
    /// event; anything else defers to the launcher. Repeated calls on an
    /// already-cancelled run return false with no side effects.
    ///
    /// The dequeuer may act on a queued run concurrently; that race is
    /// accepted here and resolved downstream, so launchers must tolerate
    /// double termination.
    pub fn cancel_run(&self, run_id: &RunId) -> Result<bool, CoordinatorError> {
        let instance = self.instance()?;
        let Some(run) = instance.get_run_by_id(run_id) else {
            return Ok(false);
        };

        if run.status == RunStatus::Queued {
            instance.report_engine_event("Canceling run from the queue.", &run);
            instance.report_run_failed(&run);
            info!(run_id = %run.run_id, "queued run canceled");
            Ok(true)
        } else {
            Ok(instance.run_launcher().terminate(run_id))
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
