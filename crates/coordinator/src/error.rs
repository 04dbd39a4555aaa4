// SPDX-License-Identifier: MIT

//! Coordinator errors

use skein_core::{RunId, RunStatus};
use thiserror::Error;

/// Failures surfaced by the run coordinator. Missing runs are reported
/// through boolean returns, not errors; these variants are programmer
/// errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    /// The weakly-held instance was dropped while the coordinator was
    /// still in use.
    #[error("instance is gone; the coordinator outlived its instance")]
    InstanceGone,

    #[error("run {run_id} must be not_started to submit, was {status:?}")]
    InvalidSubmission { run_id: RunId, status: RunStatus },
}
