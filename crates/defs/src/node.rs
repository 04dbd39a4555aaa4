// SPDX-License-Identifier: MIT

//! Node definitions: leaves (units of work) and graphs (subtrees)

use crate::dependency::DependencyStructure;
use crate::error::DefinitionError;
use crate::handle::NodeHandle;
use crate::value_type::ValueType;
use serde_json::Value;
use skein_core::schema::ConfigField;
use skein_core::toposort;
use std::collections::{BTreeMap, BTreeSet};

/// A named, typed input slot on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDef {
    pub name: String,
    pub value_type: ValueType,
    pub default_value: Option<Value>,
}

impl InputDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

/// A named, typed output slot on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDef {
    pub name: String,
    pub value_type: ValueType,
    /// Resource key of the asset store that persists this output, if any.
    pub asset_store_key: Option<String>,
}

impl OutputDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            asset_store_key: None,
        }
    }

    /// The conventional single output of a node.
    pub fn result(value_type: ValueType) -> Self {
        Self::new("result", value_type)
    }

    pub fn with_asset_store_key(mut self, key: impl Into<String>) -> Self {
        self.asset_store_key = Some(key.into());
        self
    }
}

/// A unit of computation: config schema plus ordered inputs and outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafDef {
    pub name: String,
    pub inputs: Vec<InputDef>,
    pub outputs: Vec<OutputDef>,
    pub config: Option<ConfigField>,
}

impl LeafDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            config: None,
        }
    }

    pub fn with_input(mut self, input: InputDef) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, output: OutputDef) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_config(mut self, config: ConfigField) -> Self {
        self.config = Some(config);
        self
    }
}

/// Declares that a graph input feeds one child's input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMapping {
    pub definition: InputDef,
    pub child: String,
    pub child_input: String,
}

/// Declares that a graph output is produced by one child's output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputMapping {
    pub definition: OutputDef,
    pub child: String,
    pub child_output: String,
}

/// Translates an outer config value into child configs. A graph carrying
/// one presents this single schema and hides its children from config;
/// executing the translation is the config validator's concern, not the
/// planner's.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMapping {
    pub config: ConfigField,
}

impl ConfigMapping {
    pub fn new(config: ConfigField) -> Self {
        Self { config }
    }
}

/// A named subgraph of nodes with its own dependency structure and
/// input/output mappings onto its children.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDef {
    pub name: String,
    pub children: Vec<NodeDef>,
    pub deps: DependencyStructure,
    pub input_mappings: Vec<InputMapping>,
    pub output_mappings: Vec<OutputMapping>,
    pub config_mapping: Option<ConfigMapping>,
}

impl GraphDef {
    /// Build a graph, validating child-name uniqueness, dependency
    /// references, and acyclicity of the child graph.
    pub fn new(
        name: impl Into<String>,
        children: Vec<NodeDef>,
        deps: DependencyStructure,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        let container = format!("graph \"{}\"", name);
        validate_node_list(&container, &children, &deps)?;
        Ok(Self {
            name,
            children,
            deps,
            input_mappings: Vec::new(),
            output_mappings: Vec::new(),
            config_mapping: None,
        })
    }

    /// Expose `definition` as a graph input fed into `child`'s `child_input`.
    pub fn with_input_mapping(
        mut self,
        definition: InputDef,
        child: impl Into<String>,
        child_input: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let child = child.into();
        let child_input = child_input.into();
        let container = format!("graph \"{}\"", self.name);
        let node = self.child_named(&child).ok_or_else(|| {
            DefinitionError::UnknownDependencyNode {
                container: container.clone(),
                node: child.clone(),
            }
        })?;
        if node.input_def(&child_input).is_none() {
            return Err(DefinitionError::UnknownInput {
                container,
                node: child,
                input: child_input,
            });
        }
        self.input_mappings.push(InputMapping {
            definition,
            child,
            child_input,
        });
        Ok(self)
    }

    /// Expose `definition` as a graph output produced by `child`'s `child_output`.
    pub fn with_output_mapping(
        mut self,
        definition: OutputDef,
        child: impl Into<String>,
        child_output: impl Into<String>,
    ) -> Result<Self, DefinitionError> {
        let child = child.into();
        let child_output = child_output.into();
        let container = format!("graph \"{}\"", self.name);
        let node = self.child_named(&child).ok_or_else(|| {
            DefinitionError::UnknownDependencyNode {
                container: container.clone(),
                node: child.clone(),
            }
        })?;
        if node.output_def(&child_output).is_none() {
            return Err(DefinitionError::UnknownOutput {
                container,
                node: child,
                output: child_output,
            });
        }
        self.output_mappings.push(OutputMapping {
            definition,
            child,
            child_output,
        });
        Ok(self)
    }

    pub fn with_config_mapping(mut self, mapping: ConfigMapping) -> Self {
        self.config_mapping = Some(mapping);
        self
    }

    pub fn child_named(&self, name: &str) -> Option<&NodeDef> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// The input mapping that feeds `(child, child_input)`, if any.
    pub fn mapping_for_child_input(&self, child: &str, child_input: &str) -> Option<&InputMapping> {
        self.input_mappings
            .iter()
            .find(|m| m.child == child && m.child_input == child_input)
    }

    /// The `(child, child_input)` pairs covered by this graph's input
    /// mappings; those inputs are satisfied from outside the graph.
    pub fn remapped_child_inputs(&self) -> BTreeSet<(String, String)> {
        self.input_mappings
            .iter()
            .map(|m| (m.child.clone(), m.child_input.clone()))
            .collect()
    }
}

/// A node in the pipeline graph: either a leaf or a nested graph.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDef {
    Leaf(LeafDef),
    Graph(GraphDef),
}

impl NodeDef {
    pub fn name(&self) -> &str {
        match self {
            NodeDef::Leaf(leaf) => &leaf.name,
            NodeDef::Graph(graph) => &graph.name,
        }
    }

    pub fn input_defs(&self) -> Vec<&InputDef> {
        match self {
            NodeDef::Leaf(leaf) => leaf.inputs.iter().collect(),
            NodeDef::Graph(graph) => graph.input_mappings.iter().map(|m| &m.definition).collect(),
        }
    }

    pub fn output_defs(&self) -> Vec<&OutputDef> {
        match self {
            NodeDef::Leaf(leaf) => leaf.outputs.iter().collect(),
            NodeDef::Graph(graph) => graph.output_mappings.iter().map(|m| &m.definition).collect(),
        }
    }

    pub fn input_def(&self, name: &str) -> Option<&InputDef> {
        self.input_defs().into_iter().find(|i| i.name == name)
    }

    pub fn output_def(&self, name: &str) -> Option<&OutputDef> {
        self.output_defs().into_iter().find(|o| o.name == name)
    }

    /// The config schema this node presents: a leaf's own config, or the
    /// mapped schema of a config-mapped graph.
    pub fn config_field(&self) -> Option<&ConfigField> {
        match self {
            NodeDef::Leaf(leaf) => leaf.config.as_ref(),
            NodeDef::Graph(graph) => graph.config_mapping.as_ref().map(|m| &m.config),
        }
    }

    /// Whether this node contributes anything to the config schema: its
    /// own config, a loadable input, a materializable output, or (for
    /// graphs) any child that does.
    pub fn has_config_surface(&self) -> bool {
        let loadable_input = self
            .input_defs()
            .iter()
            .any(|i| i.value_type.loader.is_some());
        let materializable_output = self
            .output_defs()
            .iter()
            .any(|o| o.value_type.materializer.is_some());
        if self.config_field().is_some() || loadable_input || materializable_output {
            return true;
        }
        match self {
            NodeDef::Leaf(_) => false,
            NodeDef::Graph(graph) => graph.children.iter().any(|c| c.has_config_surface()),
        }
    }

    /// Punch through layers of composition to the innermost leaf output
    /// that actually produces `output`, returning the producing output
    /// definition and the handle of its leaf.
    pub fn resolve_output_to_origin(
        &self,
        output: &str,
        handle: &NodeHandle,
    ) -> Result<(&OutputDef, NodeHandle), DefinitionError> {
        match self {
            NodeDef::Leaf(leaf) => {
                let def = leaf
                    .outputs
                    .iter()
                    .find(|o| o.name == output)
                    .ok_or_else(|| DefinitionError::UnknownOutput {
                        container: format!("node \"{}\"", leaf.name),
                        node: leaf.name.clone(),
                        output: output.to_string(),
                    })?;
                Ok((def, handle.clone()))
            }
            NodeDef::Graph(graph) => {
                let mapping = graph
                    .output_mappings
                    .iter()
                    .find(|m| m.definition.name == output)
                    .ok_or_else(|| DefinitionError::UnknownOutput {
                        container: format!("graph \"{}\"", graph.name),
                        node: graph.name.clone(),
                        output: output.to_string(),
                    })?;
                let child = graph.child_named(&mapping.child).ok_or_else(|| {
                    DefinitionError::UnknownDependencyNode {
                        container: format!("graph \"{}\"", graph.name),
                        node: mapping.child.clone(),
                    }
                })?;
                child.resolve_output_to_origin(&mapping.child_output, &handle.child(&mapping.child))
            }
        }
    }
}

/// Validate one graph level: unique names, resolvable dependency
/// references, and no cycles.
pub(crate) fn validate_node_list(
    container: &str,
    nodes: &[NodeDef],
    deps: &DependencyStructure,
) -> Result<(), DefinitionError> {
    let mut seen = BTreeSet::new();
    for node in nodes {
        if !seen.insert(node.name()) {
            return Err(DefinitionError::DuplicateNodeName {
                container: container.to_string(),
                node: node.name().to_string(),
            });
        }
    }

    deps.validate(container, nodes)?;

    let mut dep_map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in nodes {
        let upstream = deps
            .upstream_node_names(node.name())
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        dep_map.insert(node.name().to_string(), upstream);
    }
    toposort::toposort(&dep_map).map_err(|cycle| DefinitionError::CircularDependency {
        container: container.to_string(),
        nodes: cycle.remaining,
    })?;

    Ok(())
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
