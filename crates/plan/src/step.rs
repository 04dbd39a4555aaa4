// SPDX-License-Identifier: MIT

//! Execution steps and the handles naming their outputs

use crate::inputs::StepInput;
use serde::{Deserialize, Serialize};
use skein_defs::{LeafDef, NodeHandle};

/// Names one output of one step: `{step_key, output_name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepOutputHandle {
    pub step_key: String,
    pub output_name: String,
}

impl StepOutputHandle {
    pub fn new(step_key: impl Into<String>, output_name: impl Into<String>) -> Self {
        Self {
            step_key: step_key.into(),
            output_name: output_name.into(),
        }
    }
}

/// Names the asset store resource that persists one step output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetStoreHandle {
    pub asset_store_key: String,
}

impl AssetStoreHandle {
    pub fn new(asset_store_key: impl Into<String>) -> Self {
        Self {
            asset_store_key: asset_store_key.into(),
        }
    }
}

/// An output a step declares it will produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutput {
    pub name: String,
    pub asset_store_handle: Option<AssetStoreHandle>,
}

/// One executable unit of the plan. Step identity is the handle path of
/// its originating leaf node; the `.`-joined handle string is the step
/// key used in every external index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub key: String,
    pub handle: NodeHandle,
    pub step_inputs: Vec<StepInput>,
    pub step_outputs: Vec<StepOutput>,
}

impl ExecutionStep {
    /// The compute step for one leaf node instance.
    pub fn for_leaf(leaf: &LeafDef, step_inputs: Vec<StepInput>, handle: &NodeHandle) -> Self {
        let step_outputs = leaf
            .outputs
            .iter()
            .map(|output| StepOutput {
                name: output.name.clone(),
                asset_store_handle: output
                    .asset_store_key
                    .as_deref()
                    .map(AssetStoreHandle::new),
            })
            .collect();
        Self {
            key: handle.to_string(),
            handle: handle.clone(),
            step_inputs,
            step_outputs,
        }
    }

    pub fn step_output_named(&self, name: &str) -> Option<&StepOutput> {
        self.step_outputs.iter().find(|o| o.name == name)
    }

    pub fn step_input_named(&self, name: &str) -> Option<&StepInput> {
        self.step_inputs.iter().find(|i| i.name == name)
    }

    /// Keys of the steps whose outputs feed this step.
    pub fn dependency_keys(&self) -> Vec<&str> {
        self.step_inputs
            .iter()
            .flat_map(|input| input.dependency_keys())
            .collect()
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
