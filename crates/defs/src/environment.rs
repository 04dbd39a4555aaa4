// SPDX-License-Identifier: MIT

//! Environment config schema synthesis.
//!
//! Walks a pipeline's node tree and a mode definition to produce the root
//! environment shape: `solids`, `storage`, `intermediate_storage`,
//! `execution`, `loggers`, and `resources` fields, each synthesized from
//! the definitions that back them. Built once per (pipeline, mode) pair
//! and immutable afterwards.

use crate::dependency::DependencyStructure;
use crate::error::DefinitionError;
use crate::mode::ModeDef;
use crate::node::NodeDef;
use crate::pipeline::PipelineDef;
use crate::registry::ConfigTypeRegistry;
use serde_json::Value;
use skein_core::schema::{ConfigField, ConfigScheme, ConfigType, Shape};
use std::collections::BTreeSet;

/// Description attached to config fields of nodes outside the current
/// node selection.
const IGNORED_NODE_DESCRIPTION: &str =
    "this node is not present in the current node selection, the config values are allowed but ignored";

/// The synthesized schema for one (pipeline, mode) pair: the root
/// environment type plus the registry of every reachable config type.
#[derive(Debug, Clone)]
pub struct EnvironmentSchema {
    pub environment_type: ConfigType,
    pub registry: ConfigTypeRegistry,
}

/// Synthesize the environment schema for `pipeline` in `mode` (`None`
/// selects the default mode). `selection` optionally restricts the
/// included root nodes; excluded nodes still appear in the schema but
/// their config is optional and marked ignored.
pub fn create_environment_schema(
    pipeline: &PipelineDef,
    mode: Option<&str>,
    selection: Option<&BTreeSet<String>>,
) -> Result<EnvironmentSchema, DefinitionError> {
    let mode_def = pipeline.mode_def(mode)?;
    let environment_type = define_environment_type(pipeline, mode_def, selection);
    let registry = ConfigTypeRegistry::build(&pipeline.nodes, &environment_type)?;
    Ok(EnvironmentSchema {
        environment_type,
        registry,
    })
}

fn define_environment_type(
    pipeline: &PipelineDef,
    mode: &ModeDef,
    selection: Option<&BTreeSet<String>>,
) -> ConfigType {
    let solids_shape = define_node_dictionary(
        &pipeline.nodes,
        &pipeline.deps,
        &BTreeSet::new(),
        selection,
    );
    let solids_field = if solids_shape.is_empty() {
        None
    } else {
        Some(ConfigField::new(ConfigType::shape(solids_shape)))
    };

    let storage_fields = if mode.intermediate_storages.is_empty() {
        (None, None)
    } else {
        let selector = selector_for_named_defs(
            mode.intermediate_storages
                .iter()
                .map(|s| (s.name.as_str(), s.config.as_ref())),
        );
        let intermediate = define_storage_field(
            selector.clone(),
            &mode.storage_names(),
            mode.has_default_storage_set(),
        );
        // Alias of intermediate_storage kept for older run configs,
        // pending removal of the legacy field.
        let legacy = ConfigField::optional(selector)
            .with_description("deprecated alias of intermediate_storage");
        (Some(legacy), Some(intermediate))
    };
    let (storage_field, intermediate_storage_field) = storage_fields;

    let execution_field = if mode.executors.is_empty() {
        None
    } else {
        Some(ConfigField::optional(selector_for_named_defs(
            mode.executors
                .iter()
                .map(|e| (e.name.as_str(), e.config.as_ref())),
        )))
    };

    let loggers_field = if mode.loggers.is_empty() {
        None
    } else {
        let mut fields = Shape::new();
        for (name, logger) in &mode.loggers {
            fields.insert(name, def_config_field(logger.config.as_ref(), Some(false)));
        }
        Some(ConfigField::new(ConfigType::shape(fields)))
    };

    let resources_field = if mode.resources.is_empty() {
        None
    } else {
        let mut fields = Shape::new();
        for (name, resource) in &mode.resources {
            fields.insert(name, def_config_field(resource.config.as_ref(), None));
        }
        Some(ConfigField::new(ConfigType::shape(fields)))
    };

    ConfigType::shape(Shape::from_entries([
        ("solids", solids_field),
        ("storage", storage_field),
        ("intermediate_storage", intermediate_storage_field),
        ("execution", execution_field),
        ("loggers", loggers_field),
        ("resources", resources_field),
    ]))
}

/// Wrap a definition's own config in the `{config?}` envelope every
/// configurable definition presents.
fn def_config_field(config: Option<&ConfigField>, is_required: Option<bool>) -> ConfigField {
    let shape = Shape::from_entries([("config", config.cloned())]);
    let config_type = ConfigType::shape(shape);
    match is_required {
        Some(true) => ConfigField::required(config_type),
        Some(false) => ConfigField::optional(config_type),
        None => ConfigField::new(config_type),
    }
}

/// A selector over a set of named definitions, so that exactly one of
/// them is chosen.
fn selector_for_named_defs<'a>(
    defs: impl IntoIterator<Item = (&'a str, Option<&'a ConfigField>)>,
) -> ConfigType {
    let mut shape = Shape::new();
    for (name, config) in defs {
        shape.insert(name, def_config_field(config, None));
    }
    ConfigType::selector(shape)
}

/// The `intermediate_storage` field. A mode offering exactly the default
/// storage pair needs no configuration at all; otherwise the field
/// defaults to the first declared storage whose config is transitively
/// optional, and is required when no storage qualifies.
fn define_storage_field(
    selector: ConfigType,
    storage_names: &[&str],
    is_default_set: bool,
) -> ConfigField {
    if is_default_set {
        return ConfigField::optional(selector);
    }

    let default = match &selector.scheme {
        ConfigScheme::Selector(shape) => storage_names.iter().find_map(|name| {
            shape
                .get(name)
                .filter(|field| field.config_type.all_optional())
                .map(|_| {
                    let mut object = serde_json::Map::new();
                    object.insert((*name).to_string(), Value::Object(serde_json::Map::new()));
                    Value::Object(object)
                })
        }),
        _ => None,
    };

    match default {
        Some(value) => ConfigField::new(selector).with_default(value),
        None => ConfigField::new(selector),
    }
}

/// The `inputs` sub-field: one entry per input whose type has a loader
/// and which is neither dependency-satisfied nor remapped into the
/// enclosing graph. Required unless the input declares a default.
fn get_inputs_field(
    node: &NodeDef,
    deps: &DependencyStructure,
    remapped: &BTreeSet<(String, String)>,
) -> Option<ConfigField> {
    let mut fields = Shape::new();
    for input in node.input_defs() {
        let Some(loader) = &input.value_type.loader else {
            continue;
        };
        if deps.has_deps(node.name(), &input.name) {
            continue;
        }
        if remapped.contains(&(node.name().to_string(), input.name.clone())) {
            continue;
        }
        let field = if input.has_default() {
            ConfigField::optional(loader.clone())
        } else {
            ConfigField::required(loader.clone())
        };
        fields.insert(&input.name, field);
    }

    if fields.is_empty() {
        None
    } else {
        Some(ConfigField::new(ConfigType::shape(fields)))
    }
}

/// The `outputs` sub-field: an array of shapes offering one optional
/// entry per materializable output.
fn get_outputs_field(node: &NodeDef) -> Option<ConfigField> {
    let mut fields = Shape::new();
    for output in node.output_defs() {
        if let Some(materializer) = &output.value_type.materializer {
            fields.insert(&output.name, ConfigField::optional(materializer.clone()));
        }
    }

    if fields.is_empty() {
        None
    } else {
        Some(ConfigField::optional(ConfigType::array(ConfigType::shape(
            fields,
        ))))
    }
}

fn node_config_field<const N: usize>(
    entries: [(&'static str, Option<ConfigField>); N],
    ignored: bool,
) -> ConfigField {
    let config_type = ConfigType::shape(Shape::from_entries(entries));
    if ignored {
        ConfigField::optional(config_type).with_description(IGNORED_NODE_DESCRIPTION)
    } else {
        ConfigField::new(config_type)
    }
}

/// One node's entry in a `solids` shape.
///
/// Leaves and config-mapped graphs present `{config?, inputs?, outputs?}`;
/// a config-mapped graph hides its children. Plain graphs present
/// `{inputs?, outputs?, solids}` with a recursive dictionary.
fn define_node_field(
    node: &NodeDef,
    deps: &DependencyStructure,
    remapped: &BTreeSet<(String, String)>,
    ignored: bool,
) -> ConfigField {
    let plain_graph = match node {
        NodeDef::Leaf(_) => None,
        NodeDef::Graph(graph) => (graph.config_mapping.is_none()).then_some(graph),
    };

    match plain_graph {
        None => node_config_field(
            [
                ("inputs", get_inputs_field(node, deps, remapped)),
                ("outputs", get_outputs_field(node)),
                ("config", node.config_field().cloned()),
            ],
            ignored,
        ),
        Some(graph) => {
            let child_remapped = graph.remapped_child_inputs();
            let children =
                define_node_dictionary(&graph.children, &graph.deps, &child_remapped, None);
            node_config_field(
                [
                    ("inputs", get_inputs_field(node, deps, remapped)),
                    ("outputs", get_outputs_field(node)),
                    (
                        "solids",
                        Some(ConfigField::new(ConfigType::shape(children))),
                    ),
                ],
                ignored,
            )
        }
    }
}

/// The shape over one level of nodes; nodes with no configurable surface
/// are omitted entirely.
fn define_node_dictionary(
    nodes: &[NodeDef],
    deps: &DependencyStructure,
    remapped: &BTreeSet<(String, String)>,
    selection: Option<&BTreeSet<String>>,
) -> Shape {
    let mut fields = Shape::new();
    for node in nodes {
        if !node.has_config_surface() {
            continue;
        }
        let ignored = selection.is_some_and(|included| !included.contains(node.name()));
        fields.insert(node.name(), define_node_field(node, deps, remapped, ignored));
    }
    fields
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
