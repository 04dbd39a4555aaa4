// SPDX-License-Identifier: MIT

//! The immutable execution plan

use crate::builder::PlanBuilder;
use crate::env::EnvironmentConfig;
use crate::error::PlanError;
use crate::step::{AssetStoreHandle, ExecutionStep, StepOutput, StepOutputHandle};
use indexmap::IndexMap;
use skein_core::toposort::toposort;
use skein_defs::PipelineDef;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Computes step and step-output versions for memoized re-execution.
/// Versioning policy lives outside the planner; the plan only delegates.
pub trait StepVersioner {
    fn resolve_step_versions(&self, plan: &ExecutionPlan) -> HashMap<String, Option<String>>;

    fn resolve_step_output_versions(
        &self,
        plan: &ExecutionPlan,
    ) -> HashMap<StepOutputHandle, Option<String>>;
}

/// An ordered, immutable set of executable steps with resolved input
/// provenance. Subset plans share the step dictionary and dependency
/// graph with the plan they derive from.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pipeline_name: String,
    steps: Arc<IndexMap<String, ExecutionStep>>,
    deps: Arc<BTreeMap<String, BTreeSet<String>>>,
    artifacts_persistent: bool,
    step_keys_to_execute: Vec<String>,
    environment_config: Arc<EnvironmentConfig>,
}

impl ExecutionPlan {
    /// Build a plan for `pipeline` under `environment_config` in `mode`
    /// (`None` selects the default mode), optionally restricted to
    /// `step_keys_to_execute`.
    pub fn build(
        pipeline: &PipelineDef,
        environment_config: Arc<EnvironmentConfig>,
        mode: Option<&str>,
        step_keys_to_execute: Option<Vec<String>>,
    ) -> Result<Self, PlanError> {
        let mode_def = pipeline.mode_def(mode)?;
        PlanBuilder::new(pipeline, mode_def, environment_config, step_keys_to_execute).build()
    }

    pub(crate) fn from_parts(
        pipeline_name: String,
        steps: Arc<IndexMap<String, ExecutionStep>>,
        deps: Arc<BTreeMap<String, BTreeSet<String>>>,
        artifacts_persistent: bool,
        step_keys_to_execute: Vec<String>,
        environment_config: Arc<EnvironmentConfig>,
    ) -> Result<Self, PlanError> {
        let missing: Vec<String> = step_keys_to_execute
            .iter()
            .filter(|key| !steps.contains_key(*key))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PlanError::StepsNotFound { keys: missing });
        }
        Ok(Self {
            pipeline_name,
            steps,
            deps,
            artifacts_persistent,
            step_keys_to_execute,
            environment_config,
        })
    }

    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }

    /// All steps, in topological insertion order.
    pub fn steps(&self) -> impl Iterator<Item = &ExecutionStep> {
        self.steps.values()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn deps(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.deps
    }

    /// Whether intermediate values written during this run survive the
    /// run's process.
    pub fn artifacts_persistent(&self) -> bool {
        self.artifacts_persistent
    }

    pub fn step_keys_to_execute(&self) -> &[String] {
        &self.step_keys_to_execute
    }

    pub fn environment_config(&self) -> &EnvironmentConfig {
        &self.environment_config
    }

    pub fn has_step(&self, key: &str) -> bool {
        self.steps.contains_key(key)
    }

    pub fn get_step_by_key(&self, key: &str) -> Option<&ExecutionStep> {
        self.steps.get(key)
    }

    pub fn get_step_output(&self, handle: &StepOutputHandle) -> Option<&StepOutput> {
        self.get_step_by_key(&handle.step_key)
            .and_then(|step| step.step_output_named(&handle.output_name))
    }

    pub fn get_asset_store_handle(&self, handle: &StepOutputHandle) -> Option<&AssetStoreHandle> {
        self.get_step_output(handle)
            .and_then(|output| output.asset_store_handle.as_ref())
    }

    pub fn get_asset_store_key(&self, handle: &StepOutputHandle) -> Option<&str> {
        self.get_asset_store_handle(handle)
            .map(|h| h.asset_store_key.as_str())
    }

    /// Layered topological levels over the full dependency graph. Keys
    /// within a level come out lexicographically sorted, so the
    /// partitioning is identical across runs.
    pub fn topological_step_levels(&self) -> Result<Vec<Vec<String>>, PlanError> {
        Ok(toposort(&self.deps)?)
    }

    /// All step keys in one flattened topological order.
    pub fn topological_step_keys(&self) -> Result<Vec<String>, PlanError> {
        Ok(self.topological_step_levels()?.into_iter().flatten().collect())
    }

    /// The dependency graph restricted to `step_keys_to_execute`; edges
    /// to excluded steps are dropped.
    pub fn execution_deps(&self) -> BTreeMap<String, BTreeSet<String>> {
        let executing: BTreeSet<&str> = self
            .step_keys_to_execute
            .iter()
            .map(String::as_str)
            .collect();
        let mut deps = BTreeMap::new();
        for key in &self.step_keys_to_execute {
            let upstream = self
                .deps
                .get(key)
                .map(|up| {
                    up.iter()
                        .filter(|dep| executing.contains(dep.as_str()))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            deps.insert(key.clone(), upstream);
        }
        deps
    }

    /// Topological levels over the execution subset only.
    pub fn execution_step_levels(&self) -> Result<Vec<Vec<String>>, PlanError> {
        Ok(toposort(&self.execution_deps())?)
    }

    /// A derived plan sharing this plan's step dictionary with a
    /// different execution subset. Unknown keys are rejected.
    pub fn build_subset_plan(&self, step_keys_to_execute: Vec<String>) -> Result<Self, PlanError> {
        Self::from_parts(
            self.pipeline_name.clone(),
            Arc::clone(&self.steps),
            Arc::clone(&self.deps),
            self.artifacts_persistent,
            step_keys_to_execute,
            Arc::clone(&self.environment_config),
        )
    }

    pub fn resolve_step_versions(
        &self,
        versioner: &dyn StepVersioner,
    ) -> HashMap<String, Option<String>> {
        versioner.resolve_step_versions(self)
    }

    pub fn resolve_step_output_versions(
        &self,
        versioner: &dyn StepVersioner,
    ) -> HashMap<StepOutputHandle, Option<String>> {
        versioner.resolve_step_output_versions(self)
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
