// SPDX-License-Identifier: MIT

//! Plan-time errors

use skein_core::toposort::CycleError;
use skein_defs::DefinitionError;
use thiserror::Error;

/// Errors raised while building or subsetting an execution plan. All are
/// terminal; there is no retry or fallback path.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(
        "in pipeline {pipeline} node {node}, input {input} must get a value either (a) from a \
         dependency or (b) from the inputs section of its configuration"
    )]
    UnsatisfiedInput {
        pipeline: String,
        node: String,
        input: String,
    },

    #[error("duplicated step key \"{key}\"; full list seen so far: {}", seen.join(", "))]
    DuplicateStepKey { key: String, seen: Vec<String> },

    #[error("no step output recorded for {node}.{output}; upstream nodes must be planned first")]
    UnresolvedStepOutput { node: String, output: String },

    #[error("execution plan does not contain step(s): {}", keys.join(", "))]
    StepsNotFound { keys: Vec<String> },

    #[error(
        "an intermediate storage, \"{storage}\", and a non-default asset store are both \
         specified; specify only one: omit \"intermediate_storage\" from the run config and the \
         custom storage defs from the mode, or rebind \"asset_store\" to the in-memory default"
    )]
    StorageAssetStoreConflict { storage: String },

    #[error(
        "both \"storage\" and \"intermediate_storage\" are set; \"storage\" is a deprecated \
         alias, set only \"intermediate_storage\""
    )]
    ConflictingStorageFields,

    #[error("execution plan dependency graph is cyclic: {0}")]
    CyclicPlan(#[from] CycleError),

    #[error("invalid run config: {0}")]
    InvalidRunConfig(#[from] serde_json::Error),
}
