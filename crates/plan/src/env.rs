// SPDX-License-Identifier: MIT

//! Parsed environment config, shaped like the synthesized environment
//! schema. Validation against the schema is the consumer's concern; this
//! representation only carries what the plan builder consults.

use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use skein_defs::{DefinitionError, ModeDef, StorageDef};
use std::collections::HashMap;

/// Storage selected when the run config does not name one.
pub const DEFAULT_INTERMEDIATE_STORAGE: &str = "in_memory";

/// The per-node section of a run config, keyed externally by the node's
/// handle string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRunConfig {
    #[serde(default)]
    pub config: Option<Value>,
    #[serde(default)]
    pub inputs: HashMap<String, Value>,
    #[serde(default)]
    pub outputs: Vec<HashMap<String, Value>>,
}

impl NodeRunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_input(mut self, name: impl Into<String>, value: Value) -> Self {
        self.inputs.insert(name.into(), value);
        self
    }
}

/// One intermediate storage chosen by name, plus its own config value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSelection {
    pub name: String,
    #[serde(default)]
    pub config: Option<Value>,
}

impl StorageSelection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }
}

/// Serialized form, still carrying the legacy `storage` alias.
#[derive(Debug, Default, Deserialize)]
struct RawEnvironmentConfig {
    #[serde(default)]
    solids: HashMap<String, NodeRunConfig>,
    #[serde(default)]
    storage: Option<StorageSelection>,
    #[serde(default)]
    intermediate_storage: Option<StorageSelection>,
    #[serde(default)]
    execution: Option<Value>,
    #[serde(default)]
    loggers: HashMap<String, Value>,
    #[serde(default)]
    resources: HashMap<String, Value>,
    #[serde(default)]
    mode: Option<String>,
}

/// A validated run config instance. `solids` is flat, keyed by handle
/// string (`outer.inner.leaf`), matching how the plan builder looks nodes
/// up during traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub solids: HashMap<String, NodeRunConfig>,
    #[serde(default)]
    pub intermediate_storage: Option<StorageSelection>,
    #[serde(default)]
    pub execution: Option<Value>,
    #[serde(default)]
    pub loggers: HashMap<String, Value>,
    #[serde(default)]
    pub resources: HashMap<String, Value>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized run config. The legacy `storage` key is folded
    /// into `intermediate_storage`; setting both is rejected here, at the
    /// top-level resolver.
    pub fn from_value(value: Value) -> Result<Self, PlanError> {
        let raw: RawEnvironmentConfig = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnvironmentConfig) -> Result<Self, PlanError> {
        let intermediate_storage = match (raw.storage, raw.intermediate_storage) {
            (Some(_), Some(_)) => return Err(PlanError::ConflictingStorageFields),
            (legacy, preferred) => preferred.or(legacy),
        };
        Ok(Self {
            solids: raw.solids,
            intermediate_storage,
            execution: raw.execution,
            loggers: raw.loggers,
            resources: raw.resources,
            mode: raw.mode,
        })
    }

    pub fn with_node_config(mut self, handle: impl Into<String>, config: NodeRunConfig) -> Self {
        self.solids.insert(handle.into(), config);
        self
    }

    /// Set one input value under `solids.<handle>.inputs.<input>`.
    pub fn with_input_value(
        mut self,
        handle: impl Into<String>,
        input: impl Into<String>,
        value: Value,
    ) -> Self {
        let entry = self.solids.entry(handle.into()).or_default();
        entry.inputs.insert(input.into(), value);
        self
    }

    pub fn with_intermediate_storage(mut self, selection: StorageSelection) -> Self {
        self.intermediate_storage = Some(selection);
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn node_config(&self, handle: &str) -> Option<&NodeRunConfig> {
        self.solids.get(handle)
    }

    /// The configured input value for `solids.<handle>.inputs.<input>`.
    pub fn input_value(&self, handle: &str, input: &str) -> Option<&Value> {
        self.node_config(handle).and_then(|c| c.inputs.get(input))
    }

    pub fn intermediate_storage_name(&self) -> &str {
        self.intermediate_storage
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or(DEFAULT_INTERMEDIATE_STORAGE)
    }

    /// The storage def this run uses in `mode`: the explicitly selected
    /// one when the config names it, otherwise the storage the synthesized
    /// schema would default to (none for the default storage pair).
    pub fn intermediate_storage_def_for_mode<'m>(
        &self,
        mode: &'m ModeDef,
    ) -> Result<Option<&'m StorageDef>, DefinitionError> {
        match &self.intermediate_storage {
            Some(selection) => mode
                .intermediate_storage_def(&selection.name)
                .map(Some)
                .ok_or_else(|| DefinitionError::UnknownStorage {
                    mode: mode.name.clone(),
                    storage: selection.name.clone(),
                }),
            None if mode.has_default_storage_set() => Ok(None),
            None => Ok(schema_default_storage(mode)),
        }
    }
}

/// The storage the synthesized schema defaults to for a non-default
/// storage set: the first declared storage whose config envelope is
/// transitively optional.
fn schema_default_storage(mode: &ModeDef) -> Option<&StorageDef> {
    mode.intermediate_storages
        .iter()
        .find(|storage| storage.config.as_ref().map(|f| !f.is_required).unwrap_or(true))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
