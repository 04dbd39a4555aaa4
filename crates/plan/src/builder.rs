// SPDX-License-Identifier: MIT

//! Plan builder: recursive descent over the pipeline in topological
//! order, resolving each input's provenance and registering one compute
//! step per leaf node instance.

use crate::env::EnvironmentConfig;
use crate::error::PlanError;
use crate::inputs::{StepInput, StepInputSource, StepOutputSource};
use crate::plan::ExecutionPlan;
use crate::step::{ExecutionStep, StepOutputHandle};
use indexmap::IndexMap;
use skein_defs::{
    nodes_in_topological_order, DependencyStructure, GraphDef, InputDef, ModeDef, NodeDef,
    NodeHandle, OutputRef, PipelineDef, StorageDef,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

/// State accumulated while walking one pipeline. The step map is handed
/// off to the immutable [`ExecutionPlan`] at the end of the build.
pub(crate) struct PlanBuilder<'a> {
    pipeline: &'a PipelineDef,
    mode: &'a ModeDef,
    environment_config: Arc<EnvironmentConfig>,
    step_keys_to_execute: Option<Vec<String>>,
    steps: IndexMap<String, ExecutionStep>,
    /// Maps logical (node handle, output name) pairs to the physical
    /// output of the producing leaf, across composition layers.
    step_output_map: HashMap<(NodeHandle, String), StepOutputHandle>,
}

impl<'a> PlanBuilder<'a> {
    pub(crate) fn new(
        pipeline: &'a PipelineDef,
        mode: &'a ModeDef,
        environment_config: Arc<EnvironmentConfig>,
        step_keys_to_execute: Option<Vec<String>>,
    ) -> Self {
        Self {
            pipeline,
            mode,
            environment_config,
            step_keys_to_execute,
            steps: IndexMap::new(),
            step_output_map: HashMap::new(),
        }
    }

    pub(crate) fn build(mut self) -> Result<ExecutionPlan, PlanError> {
        let pipeline = self.pipeline;
        let ordered = pipeline.nodes_in_topological_order()?;
        self.build_from_sorted_nodes(ordered, &pipeline.deps, None, None)?;

        let mut deps: BTreeMap<String, BTreeSet<String>> = self
            .steps
            .keys()
            .map(|key| (key.clone(), BTreeSet::new()))
            .collect();
        for step in self.steps.values() {
            if let Some(upstream) = deps.get_mut(&step.key) {
                upstream.extend(step.dependency_keys().into_iter().map(|k| k.to_string()));
            }
        }

        check_asset_store_intermediate_storage(self.mode, &self.environment_config)?;
        let artifacts_persistent = self.storage_is_persistent()?;

        let step_keys_to_execute = self
            .step_keys_to_execute
            .take()
            .unwrap_or_else(|| self.steps.keys().cloned().collect());

        debug!(
            pipeline = %pipeline.name,
            steps = self.steps.len(),
            "execution plan built"
        );

        ExecutionPlan::from_parts(
            pipeline.name.clone(),
            Arc::new(self.steps),
            Arc::new(deps),
            artifacts_persistent,
            step_keys_to_execute,
            self.environment_config,
        )
    }

    fn build_from_sorted_nodes(
        &mut self,
        nodes: Vec<&'a NodeDef>,
        deps: &'a DependencyStructure,
        parent_handle: Option<&NodeHandle>,
        enclosing: Option<(&'a GraphDef, &[StepInput])>,
    ) -> Result<(), PlanError> {
        for node in nodes {
            let handle = NodeHandle::for_node(parent_handle, node.name());

            let mut step_inputs = Vec::new();
            for input_def in node.input_defs() {
                let resolved = self.resolve_step_input(
                    node,
                    input_def,
                    deps,
                    &handle,
                    parent_handle,
                    enclosing,
                )?;
                // Inputs of kind Nothing with no value resolve to nothing
                // at all; no step input is recorded for them.
                if let Some(step_input) = resolved {
                    step_inputs.push(step_input);
                }
            }

            match node {
                NodeDef::Leaf(leaf) => {
                    let step = ExecutionStep::for_leaf(leaf, step_inputs, &handle);
                    debug!(step_key = %step.key, inputs = step.step_inputs.len(), "step added");
                    self.add_step(step)?;
                }
                NodeDef::Graph(graph) => {
                    let container = format!("graph \"{}\"", graph.name);
                    let ordered =
                        nodes_in_topological_order(&container, &graph.children, &graph.deps)?;
                    self.build_from_sorted_nodes(
                        ordered,
                        &graph.deps,
                        Some(&handle),
                        Some((graph, &step_inputs)),
                    )?;
                }
            }

            // Record where each logical output of this node physically
            // originates, so downstream siblings can attach to it.
            for output_def in node.output_defs() {
                let (origin_def, origin_handle) =
                    node.resolve_output_to_origin(&output_def.name, &handle)?;
                let origin_key = origin_handle.to_string();
                let step = self.steps.get(&origin_key).ok_or_else(|| {
                    PlanError::UnresolvedStepOutput {
                        node: origin_key.clone(),
                        output: origin_def.name.clone(),
                    }
                })?;
                self.step_output_map.insert(
                    (handle.clone(), output_def.name.clone()),
                    StepOutputHandle::new(step.key.clone(), origin_def.name.clone()),
                );
            }
        }
        Ok(())
    }

    /// Resolve one input's provenance, first match wins: config value,
    /// singular dependency, fan-in, enclosing-graph remap, declared
    /// default, Nothing-kind elision, and otherwise a terminal error.
    fn resolve_step_input(
        &self,
        node: &NodeDef,
        input_def: &InputDef,
        deps: &DependencyStructure,
        handle: &NodeHandle,
        parent_handle: Option<&NodeHandle>,
        enclosing: Option<(&GraphDef, &[StepInput])>,
    ) -> Result<Option<StepInput>, PlanError> {
        let input_name = input_def.name.as_str();

        if let Some(value) = self
            .environment_config
            .input_value(&handle.to_string(), input_name)
        {
            return Ok(Some(StepInput::new(
                input_name,
                input_def.value_type.clone(),
                StepInputSource::FromConfig {
                    value: value.clone(),
                    input_name: input_name.to_string(),
                },
            )));
        }

        if let Some(output_ref) = deps.singular(node.name(), input_name) {
            let step_output_handle = self.output_handle_for(parent_handle, output_ref)?;
            return Ok(Some(StepInput::new(
                input_name,
                input_def.value_type.clone(),
                StepInputSource::FromStepOutput(StepOutputSource::new(
                    step_output_handle,
                    input_def.value_type.clone(),
                )),
            )));
        }

        if let Some(output_refs) = deps.fan_in(node.name(), input_name) {
            let mut sources = Vec::with_capacity(output_refs.len());
            for output_ref in output_refs {
                let step_output_handle = self.output_handle_for(parent_handle, output_ref)?;
                sources.push(
                    StepOutputSource::new(
                        step_output_handle,
                        input_def.value_type.inner_type_for_fan_in().clone(),
                    )
                    .checked_for_missing(),
                );
            }
            return Ok(Some(StepInput::new(
                input_name,
                input_def.value_type.clone(),
                StepInputSource::FromMultipleSources { sources },
            )));
        }

        if let Some((graph, parent_step_inputs)) = enclosing {
            if let Some(mapping) = graph.mapping_for_child_input(node.name(), input_name) {
                let parent_name = mapping.definition.name.as_str();
                if let Some(parent_input) =
                    parent_step_inputs.iter().find(|i| i.name == parent_name)
                {
                    return Ok(Some(StepInput::new(
                        input_name,
                        input_def.value_type.clone(),
                        parent_input.source.clone(),
                    )));
                }
            }
        }

        if let Some(default) = &input_def.default_value {
            return Ok(Some(StepInput::new(
                input_name,
                input_def.value_type.clone(),
                StepInputSource::FromDefaultValue {
                    value: default.clone(),
                },
            )));
        }

        if input_def.value_type.kind == skein_defs::TypeKind::Nothing {
            return Ok(None);
        }

        Err(PlanError::UnsatisfiedInput {
            pipeline: self.pipeline.name.clone(),
            node: node.name().to_string(),
            input: input_name.to_string(),
        })
    }

    /// The physical step output behind a sibling's logical output at the
    /// current graph level.
    fn output_handle_for(
        &self,
        parent_handle: Option<&NodeHandle>,
        output_ref: &OutputRef,
    ) -> Result<StepOutputHandle, PlanError> {
        let sibling = NodeHandle::for_node(parent_handle, &output_ref.node);
        self.step_output_map
            .get(&(sibling.clone(), output_ref.output.clone()))
            .cloned()
            .ok_or_else(|| PlanError::UnresolvedStepOutput {
                node: sibling.to_string(),
                output: output_ref.output.clone(),
            })
    }

    fn add_step(&mut self, step: ExecutionStep) -> Result<(), PlanError> {
        if self.steps.contains_key(&step.key) {
            return Err(PlanError::DuplicateStepKey {
                key: step.key,
                seen: self.steps.keys().cloned().collect(),
            });
        }
        self.steps.insert(step.key.clone(), step);
        Ok(())
    }

    fn storage_is_persistent(&self) -> Result<bool, PlanError> {
        let selected = self
            .environment_config
            .intermediate_storage_def_for_mode(self.mode)?;
        Ok(selected.map(|def| def.is_persistent).unwrap_or(false))
    }
}

/// Exactly one of intermediate storage and the mode's asset store may be
/// customized away from its in-memory sentinel.
fn check_asset_store_intermediate_storage(
    mode: &ModeDef,
    environment_config: &EnvironmentConfig,
) -> Result<(), PlanError> {
    let selected = environment_config.intermediate_storage_def_for_mode(mode)?;
    let storage_is_default = match selected {
        None => true,
        Some(def) => *def == StorageDef::in_memory(),
    };

    if !storage_is_default && !mode.asset_store_is_default() {
        let storage = selected.map(|d| d.name.clone()).unwrap_or_default();
        return Err(PlanError::StorageAssetStoreConflict { storage });
    }
    Ok(())
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
