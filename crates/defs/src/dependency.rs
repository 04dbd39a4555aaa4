// SPDX-License-Identifier: MIT

//! Dependency structure: which upstream outputs feed which inputs

use crate::error::DefinitionError;
use crate::node::NodeDef;
use indexmap::IndexMap;

/// A reference to a sibling node's declared output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRef {
    pub node: String,
    pub output: String,
}

impl OutputRef {
    pub fn new(node: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            output: output.into(),
        }
    }
}

/// The dependency recorded for one input of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// Exactly one upstream output.
    Single(OutputRef),
    /// An ordered list of upstream outputs feeding one fan-in input.
    FanIn(Vec<OutputRef>),
}

/// Maps `(node, input)` pairs within one graph level to their upstream
/// outputs. Every referenced output must name a sibling node's declared
/// output; `validate` enforces this at definition time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyStructure {
    deps: IndexMap<(String, String), Dependency>,
}

impl DependencyStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_single(
        self,
        node: impl Into<String>,
        input: impl Into<String>,
        upstream: OutputRef,
    ) -> Self {
        self.with_dep(node, input, Dependency::Single(upstream))
    }

    pub fn with_fan_in(
        self,
        node: impl Into<String>,
        input: impl Into<String>,
        upstream: Vec<OutputRef>,
    ) -> Self {
        self.with_dep(node, input, Dependency::FanIn(upstream))
    }

    pub fn with_dep(
        mut self,
        node: impl Into<String>,
        input: impl Into<String>,
        dep: Dependency,
    ) -> Self {
        self.deps.insert((node.into(), input.into()), dep);
        self
    }

    pub fn get(&self, node: &str, input: &str) -> Option<&Dependency> {
        self.deps.get(&(node.to_string(), input.to_string()))
    }

    pub fn has_deps(&self, node: &str, input: &str) -> bool {
        self.get(node, input).is_some()
    }

    pub fn singular(&self, node: &str, input: &str) -> Option<&OutputRef> {
        match self.get(node, input) {
            Some(Dependency::Single(output_ref)) => Some(output_ref),
            _ => None,
        }
    }

    pub fn fan_in(&self, node: &str, input: &str) -> Option<&[OutputRef]> {
        match self.get(node, input) {
            Some(Dependency::FanIn(refs)) => Some(refs),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Dependency)> {
        self.deps
            .iter()
            .map(|((node, input), dep)| (node.as_str(), input.as_str(), dep))
    }

    /// Names of the nodes that `node` depends on at this graph level.
    pub fn upstream_node_names(&self, node: &str) -> Vec<&str> {
        let mut names = Vec::new();
        for ((dep_node, _), dep) in &self.deps {
            if dep_node != node {
                continue;
            }
            match dep {
                Dependency::Single(output_ref) => names.push(output_ref.node.as_str()),
                Dependency::FanIn(refs) => {
                    names.extend(refs.iter().map(|r| r.node.as_str()));
                }
            }
        }
        names
    }

    /// Check that every entry names an existing node input and that every
    /// referenced output is declared by a sibling.
    pub(crate) fn validate(
        &self,
        container: &str,
        nodes: &[NodeDef],
    ) -> Result<(), DefinitionError> {
        let find = |name: &str| nodes.iter().find(|n| n.name() == name);

        for ((node_name, input_name), dep) in &self.deps {
            let node = find(node_name).ok_or_else(|| DefinitionError::UnknownDependencyNode {
                container: container.to_string(),
                node: node_name.clone(),
            })?;
            if node.input_def(input_name).is_none() {
                return Err(DefinitionError::UnknownInput {
                    container: container.to_string(),
                    node: node_name.clone(),
                    input: input_name.clone(),
                });
            }

            let refs: Vec<&OutputRef> = match dep {
                Dependency::Single(output_ref) => vec![output_ref],
                Dependency::FanIn(refs) => refs.iter().collect(),
            };
            for output_ref in refs {
                let upstream =
                    find(&output_ref.node).ok_or_else(|| DefinitionError::UnknownDependencyNode {
                        container: container.to_string(),
                        node: output_ref.node.clone(),
                    })?;
                if upstream.output_def(&output_ref.output).is_none() {
                    return Err(DefinitionError::UnknownOutput {
                        container: container.to_string(),
                        node: output_ref.node.clone(),
                        output: output_ref.output.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
