// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! skein-plan: compiles a pipeline definition plus a parsed environment
//! config into an immutable execution plan

mod builder;
mod env;
mod error;
mod inputs;
mod plan;
mod step;

pub use env::{
    EnvironmentConfig, NodeRunConfig, StorageSelection, DEFAULT_INTERMEDIATE_STORAGE,
};
pub use error::PlanError;
pub use inputs::{StepInput, StepInputSource, StepOutputSource};
pub use plan::{ExecutionPlan, StepVersioner};
pub use step::{AssetStoreHandle, ExecutionStep, StepOutput, StepOutputHandle};
