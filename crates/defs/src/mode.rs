// SPDX-License-Identifier: MIT

//! Mode definitions: the resources, loggers, executors, and intermediate
//! storages a pipeline can run against

use indexmap::IndexMap;
use skein_core::schema::{ConfigField, ConfigType, Shape};

/// Resource key under which a mode's asset store is bound.
pub const ASSET_STORE_RESOURCE_KEY: &str = "asset_store";

/// Names of the default intermediate storage pair.
pub const DEFAULT_STORAGE_NAMES: [&str; 2] = ["in_memory", "filesystem"];

/// A resource made available to steps at run time. The name identifies
/// the implementation; the mode's resource map key is the binding name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDef {
    pub name: String,
    pub config: Option<ConfigField>,
}

impl ResourceDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: ConfigField) -> Self {
        self.config = Some(config);
        self
    }

    /// The sentinel default asset store. A mode whose `asset_store`
    /// binding differs from this counts as user-customized.
    pub fn in_memory_asset_store() -> Self {
        Self::new("in_memory_asset_store")
    }
}

/// A logger a run may enable; all logger config is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerDef {
    pub config: Option<ConfigField>,
}

impl LoggerDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: ConfigField) -> Self {
        self.config = Some(config);
        self
    }

    /// Console logger with an optional `log_level` knob.
    pub fn console() -> Self {
        Self::new().with_config(ConfigField::optional(ConfigType::shape(
            Shape::new().with_field("log_level", ConfigField::optional(ConfigType::string())),
        )))
    }
}

/// An executor the mode offers; one is selected via the `execution` field.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorDef {
    pub name: String,
    pub config: Option<ConfigField>,
}

impl ExecutorDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: ConfigField) -> Self {
        self.config = Some(config);
        self
    }

    pub fn in_process() -> Self {
        Self::new("in_process")
    }

    pub fn multiprocess() -> Self {
        Self::new("multiprocess").with_config(ConfigField::optional(ConfigType::shape(
            Shape::new().with_field("max_concurrent", ConfigField::optional(ConfigType::int())),
        )))
    }
}

/// An intermediate storage the mode offers.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageDef {
    pub name: String,
    /// Whether values written here survive the run's process.
    pub is_persistent: bool,
    pub config: Option<ConfigField>,
}

impl StorageDef {
    pub fn new(name: impl Into<String>, is_persistent: bool) -> Self {
        Self {
            name: name.into(),
            is_persistent,
            config: None,
        }
    }

    pub fn with_config(mut self, config: ConfigField) -> Self {
        self.config = Some(config);
        self
    }

    /// The sentinel default intermediate storage.
    pub fn in_memory() -> Self {
        Self::new("in_memory", false)
    }

    pub fn filesystem() -> Self {
        Self::new("filesystem", true).with_config(ConfigField::optional(ConfigType::shape(
            Shape::new().with_field("base_dir", ConfigField::optional(ConfigType::string())),
        )))
    }

    fn defaults() -> Vec<StorageDef> {
        vec![StorageDef::in_memory(), StorageDef::filesystem()]
    }
}

/// A named execution environment for a pipeline. New modes start with the
/// default storage pair, an in-process executor, and the in-memory asset
/// store bound under [`ASSET_STORE_RESOURCE_KEY`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModeDef {
    pub name: String,
    pub resources: IndexMap<String, ResourceDef>,
    pub loggers: IndexMap<String, LoggerDef>,
    pub executors: Vec<ExecutorDef>,
    pub intermediate_storages: Vec<StorageDef>,
}

impl ModeDef {
    pub fn new(name: impl Into<String>) -> Self {
        let mut resources = IndexMap::new();
        resources.insert(
            ASSET_STORE_RESOURCE_KEY.to_string(),
            ResourceDef::in_memory_asset_store(),
        );
        Self {
            name: name.into(),
            resources,
            loggers: IndexMap::new(),
            executors: vec![ExecutorDef::in_process()],
            intermediate_storages: StorageDef::defaults(),
        }
    }

    /// Bind `resource` under `key`, replacing any existing binding.
    pub fn with_resource(mut self, key: impl Into<String>, resource: ResourceDef) -> Self {
        self.resources.insert(key.into(), resource);
        self
    }

    pub fn with_logger(mut self, name: impl Into<String>, logger: LoggerDef) -> Self {
        self.loggers.insert(name.into(), logger);
        self
    }

    /// Replace the executor list.
    pub fn with_executors(mut self, executors: Vec<ExecutorDef>) -> Self {
        self.executors = executors;
        self
    }

    /// Replace the intermediate storage list.
    pub fn with_intermediate_storages(mut self, storages: Vec<StorageDef>) -> Self {
        self.intermediate_storages = storages;
        self
    }

    pub fn intermediate_storage_def(&self, name: &str) -> Option<&StorageDef> {
        self.intermediate_storages.iter().find(|s| s.name == name)
    }

    pub fn storage_names(&self) -> Vec<&str> {
        self.intermediate_storages
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Whether the declared storage set is exactly the default pair.
    pub fn has_default_storage_set(&self) -> bool {
        let mut names: Vec<&str> = self.storage_names();
        names.sort_unstable();
        let mut defaults = DEFAULT_STORAGE_NAMES;
        defaults.sort_unstable();
        names == defaults
    }

    pub fn asset_store_resource(&self) -> Option<&ResourceDef> {
        self.resources.get(ASSET_STORE_RESOURCE_KEY)
    }

    /// True unless the mode rebinds `asset_store` to something other than
    /// the in-memory sentinel.
    pub fn asset_store_is_default(&self) -> bool {
        match self.asset_store_resource() {
            Some(resource) => *resource == ResourceDef::in_memory_asset_store(),
            None => true,
        }
    }
}

impl Default for ModeDef {
    fn default() -> Self {
        Self::new("default")
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod tests;
