// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! skein-defs: pipeline definitions, config-schema synthesis, and the
//! config type registry

mod dependency;
mod environment;
mod error;
mod handle;
mod mode;
mod node;
mod pipeline;
mod registry;
mod value_type;

pub use dependency::{Dependency, DependencyStructure, OutputRef};
pub use environment::{create_environment_schema, EnvironmentSchema};
pub use error::DefinitionError;
pub use handle::NodeHandle;
pub use mode::{
    ExecutorDef, LoggerDef, ModeDef, ResourceDef, StorageDef, ASSET_STORE_RESOURCE_KEY,
    DEFAULT_STORAGE_NAMES,
};
pub use node::{
    ConfigMapping, GraphDef, InputDef, InputMapping, LeafDef, NodeDef, OutputDef, OutputMapping,
};
pub use pipeline::{nodes_in_topological_order, PipelineDef};
pub use registry::{iterate_config_types, ConfigTypeRegistry};
pub use value_type::{builtin_value_types, TypeKind, ValueType};
