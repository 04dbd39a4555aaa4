// SPDX-License-Identifier: MIT

//! Shared fixtures for the behavioral specs.

#![allow(dead_code)]

use skein_defs::{InputDef, LeafDef, NodeDef, OutputDef, PipelineDef, ValueType};
use skein_plan::{EnvironmentConfig, ExecutionPlan, PlanError};
use std::sync::Arc;

/// A leaf producing one `result` output and taking no inputs.
pub fn source(name: &str) -> NodeDef {
    NodeDef::Leaf(LeafDef::new(name).with_output(OutputDef::result(ValueType::int())))
}

/// A leaf passing one `Int` input through to a `result` output.
pub fn sink(name: &str, input: &str) -> NodeDef {
    NodeDef::Leaf(
        LeafDef::new(name)
            .with_input(InputDef::new(input, ValueType::int()))
            .with_output(OutputDef::result(ValueType::int())),
    )
}

/// A leaf taking a fan-in list of `Int`s.
pub fn gather(name: &str, input: &str) -> NodeDef {
    NodeDef::Leaf(
        LeafDef::new(name)
            .with_input(InputDef::new(input, ValueType::list(ValueType::int())))
            .with_output(OutputDef::result(ValueType::int())),
    )
}

pub fn build_plan(
    pipeline: &PipelineDef,
    env: EnvironmentConfig,
) -> Result<ExecutionPlan, PlanError> {
    ExecutionPlan::build(pipeline, Arc::new(env), None, None)
}

pub fn build_default_plan(pipeline: &PipelineDef) -> ExecutionPlan {
    match build_plan(pipeline, EnvironmentConfig::new()) {
        Ok(plan) => plan,
        Err(err) => panic!("plan build failed: {}", err),
    }
}
