// SPDX-License-Identifier: MIT

//! Pipeline definitions and stable topological node ordering

use crate::dependency::DependencyStructure;
use crate::error::DefinitionError;
use crate::mode::ModeDef;
use crate::node::{validate_node_list, NodeDef};
use std::collections::BTreeSet;

/// A directed acyclic graph of nodes plus the modes it can run in.
/// Construction validates name uniqueness, dependency references, and
/// acyclicity; the definition is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDef {
    pub name: String,
    pub nodes: Vec<NodeDef>,
    pub deps: DependencyStructure,
    pub modes: Vec<ModeDef>,
}

impl PipelineDef {
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<NodeDef>,
        deps: DependencyStructure,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        let container = format!("pipeline \"{}\"", name);
        validate_node_list(&container, &nodes, &deps)?;
        Ok(Self {
            name,
            nodes,
            deps,
            modes: vec![ModeDef::default()],
        })
    }

    /// Replace the mode list; an empty list keeps the default mode.
    pub fn with_modes(mut self, modes: Vec<ModeDef>) -> Self {
        if !modes.is_empty() {
            self.modes = modes;
        }
        self
    }

    /// Look up a mode by name; `None` selects the default (first) mode.
    pub fn mode_def(&self, mode: Option<&str>) -> Result<&ModeDef, DefinitionError> {
        match mode {
            None => self
                .modes
                .first()
                .ok_or_else(|| DefinitionError::UnknownMode {
                    pipeline: self.name.clone(),
                    mode: "default".to_string(),
                }),
            Some(name) => self
                .modes
                .iter()
                .find(|m| m.name == name)
                .ok_or_else(|| DefinitionError::UnknownMode {
                    pipeline: self.name.clone(),
                    mode: name.to_string(),
                }),
        }
    }

    pub fn node_named(&self, name: &str) -> Option<&NodeDef> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    pub fn nodes_in_topological_order(&self) -> Result<Vec<&NodeDef>, DefinitionError> {
        nodes_in_topological_order(&self.name, &self.nodes, &self.deps)
    }
}

/// Topologically order one graph level, breaking ties by declaration
/// order so the result is identical across runs.
pub fn nodes_in_topological_order<'a>(
    container: &str,
    nodes: &'a [NodeDef],
    deps: &DependencyStructure,
) -> Result<Vec<&'a NodeDef>, DefinitionError> {
    let mut emitted: BTreeSet<&str> = BTreeSet::new();
    let mut ordered: Vec<&NodeDef> = Vec::with_capacity(nodes.len());

    while ordered.len() < nodes.len() {
        let mut progressed = false;
        for node in nodes {
            if emitted.contains(node.name()) {
                continue;
            }
            let ready = deps
                .upstream_node_names(node.name())
                .iter()
                .all(|upstream| emitted.contains(upstream));
            if ready {
                emitted.insert(node.name());
                ordered.push(node);
                progressed = true;
            }
        }
        if !progressed {
            return Err(DefinitionError::CircularDependency {
                container: container.to_string(),
                nodes: nodes
                    .iter()
                    .map(|n| n.name().to_string())
                    .filter(|n| !emitted.contains(n.as_str()))
                    .collect(),
            });
        }
    }

    Ok(ordered)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
