// SPDX-License-Identifier: MIT

//! Step inputs and the provenance of their values

use crate::step::StepOutputHandle;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skein_defs::ValueType;

/// One upstream leg feeding a step input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutputSource {
    pub step_output_handle: StepOutputHandle,
    pub value_type: ValueType,
    /// Fan-in legs tolerate a missing upstream value; singular
    /// dependencies do not.
    pub check_for_missing: bool,
}

impl StepOutputSource {
    pub fn new(step_output_handle: StepOutputHandle, value_type: ValueType) -> Self {
        Self {
            step_output_handle,
            value_type,
            check_for_missing: false,
        }
    }

    pub fn checked_for_missing(mut self) -> Self {
        self.check_for_missing = true;
        self
    }
}

/// Where a step input's value comes from, resolved at plan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StepInputSource {
    /// A literal from `solids.<handle>.inputs.<input>`, parsed via the
    /// input type's loader schema.
    FromConfig { value: Value, input_name: String },
    /// The value produced by one upstream step output.
    FromStepOutput(StepOutputSource),
    /// Fan-in over several upstream outputs, in declaration order.
    FromMultipleSources { sources: Vec<StepOutputSource> },
    /// The input definition's own default.
    FromDefaultValue { value: Value },
}

/// A named, typed input of an execution step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    pub name: String,
    pub value_type: ValueType,
    pub source: StepInputSource,
}

impl StepInput {
    pub fn new(name: impl Into<String>, value_type: ValueType, source: StepInputSource) -> Self {
        Self {
            name: name.into(),
            value_type,
            source,
        }
    }

    /// Keys of the upstream steps this input depends on.
    pub fn dependency_keys(&self) -> Vec<&str> {
        match &self.source {
            StepInputSource::FromStepOutput(source) => {
                vec![source.step_output_handle.step_key.as_str()]
            }
            StepInputSource::FromMultipleSources { sources } => sources
                .iter()
                .map(|s| s.step_output_handle.step_key.as_str())
                .collect(),
            StepInputSource::FromConfig { .. } | StepInputSource::FromDefaultValue { .. } => {
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "inputs_tests.rs"]
mod tests;
