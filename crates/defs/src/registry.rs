// SPDX-License-Identifier: MIT

//! Config type registry: every configuration type reachable from a
//! synthesized environment schema, indexed by structural key and by
//! human-given name.

use crate::error::DefinitionError;
use crate::node::NodeDef;
use crate::value_type::{builtin_value_types, ValueType};
use skein_core::schema::{builtin_config_types, ConfigScheme, ConfigType};
use std::collections::BTreeMap;

/// All config types nested within `config_type`, including itself.
/// Finite and used once at registry construction; eager materialization
/// loses nothing.
pub fn iterate_config_types(config_type: &ConfigType) -> Vec<ConfigType> {
    let mut out = Vec::new();
    collect_config_types(config_type, &mut out);
    out
}

fn collect_config_types(config_type: &ConfigType, out: &mut Vec<ConfigType>) {
    match &config_type.scheme {
        ConfigScheme::Scalar(_) => {}
        ConfigScheme::Shape(shape) | ConfigScheme::Selector(shape) => {
            for field in shape.fields().values() {
                collect_config_types(&field.config_type, out);
            }
        }
        ConfigScheme::Array(inner) => collect_config_types(inner, out),
    }
    out.push(config_type.clone());
}

/// Frozen two-way index over the config types of one pipeline build.
///
/// The key index takes the last writer on collision (keys are structural,
/// so colliding entries are identical types). The name index rejects two
/// different kinds of types sharing one name.
#[derive(Debug, Clone, Default)]
pub struct ConfigTypeRegistry {
    by_key: BTreeMap<String, ConfigType>,
    by_name: BTreeMap<String, ConfigType>,
}

impl ConfigTypeRegistry {
    /// Gather every config type reachable from the environment type, the
    /// node config fields, and the loader/materializer schemas of every
    /// reachable value type (builtins included), then index them.
    pub fn build(
        nodes: &[NodeDef],
        environment_type: &ConfigType,
    ) -> Result<Self, DefinitionError> {
        let mut registry = ConfigTypeRegistry::default();
        for builtin in builtin_config_types() {
            registry.insert(builtin)?;
        }

        let mut all = Vec::new();
        for node in nodes {
            gather_node_config_types(node, &mut all);
        }
        all.extend(iterate_config_types(environment_type));
        gather_value_type_schemas(nodes, &mut all);

        for config_type in all {
            registry.insert(config_type)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, config_type: ConfigType) -> Result<(), DefinitionError> {
        if let Some(name) = &config_type.given_name {
            if let Some(existing) = self.by_name.get(name) {
                if existing.scheme.variant_name() != config_type.scheme.variant_name() {
                    return Err(DefinitionError::DuplicateTypeName { name: name.clone() });
                }
            }
            self.by_name.insert(name.clone(), config_type.clone());
        }
        self.by_key.insert(config_type.key(), config_type);
        Ok(())
    }

    pub fn get_by_key(&self, key: &str) -> Option<&ConfigType> {
        self.by_key.get(key)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&ConfigType> {
        self.by_name.get(name)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

/// Config types declared directly on nodes: a leaf's config field, and
/// recursively every child's for graphs.
fn gather_node_config_types(node: &NodeDef, out: &mut Vec<ConfigType>) {
    match node {
        NodeDef::Leaf(leaf) => {
            if let Some(config) = &leaf.config {
                collect_config_types(&config.config_type, out);
            }
        }
        NodeDef::Graph(graph) => {
            for child in &graph.children {
                gather_node_config_types(child, out);
            }
        }
    }
}

/// Loader and materializer schemas of every value type reachable from the
/// node tree, plus the builtin value types.
fn gather_value_type_schemas(nodes: &[NodeDef], out: &mut Vec<ConfigType>) {
    let mut seen: BTreeMap<String, ValueType> = BTreeMap::new();
    for builtin in builtin_value_types() {
        add_value_type(builtin, &mut seen);
    }
    for node in nodes {
        collect_value_types(node, &mut seen);
    }

    for value_type in seen.values() {
        if let Some(loader) = &value_type.loader {
            collect_config_types(loader, out);
        }
        if let Some(materializer) = &value_type.materializer {
            collect_config_types(materializer, out);
        }
    }
}

fn collect_value_types(node: &NodeDef, seen: &mut BTreeMap<String, ValueType>) {
    for input in node.input_defs() {
        add_value_type(input.value_type.clone(), seen);
    }
    for output in node.output_defs() {
        add_value_type(output.value_type.clone(), seen);
    }
    if let NodeDef::Graph(graph) = node {
        for child in &graph.children {
            collect_value_types(child, seen);
        }
    }
}

fn add_value_type(value_type: ValueType, seen: &mut BTreeMap<String, ValueType>) {
    if seen.contains_key(&value_type.name) {
        return;
    }
    let inner = value_type.inner.clone();
    seen.insert(value_type.name.clone(), value_type);
    if let Some(inner) = inner {
        add_value_type(*inner, seen);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
