// SPDX-License-Identifier: MIT

//! Node handles: paths naming a node instance within the expanded tree

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered list of node names from the pipeline root down to one node
/// instance. Two handles are equal iff their paths are. The `.`-joined
/// string form is the step key format and must stay stable across
/// versions for replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle {
    path: Vec<String>,
}

impl NodeHandle {
    /// A root-level handle with a single segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            path: vec![name.into()],
        }
    }

    /// Extend `parent` with `name`, or start a new root handle.
    pub fn for_node(parent: Option<&NodeHandle>, name: &str) -> Self {
        match parent {
            Some(parent) => parent.child(name),
            None => NodeHandle::new(name),
        }
    }

    pub fn from_path(path: Vec<String>) -> Self {
        Self { path }
    }

    /// Parse a `.`-joined handle string back into a path.
    pub fn parse(s: &str) -> Self {
        Self {
            path: s.split('.').map(|seg| seg.to_string()).collect(),
        }
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(name.into());
        Self { path }
    }

    /// The innermost node name.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    pub fn parent(&self) -> Option<NodeHandle> {
        if self.path.len() > 1 {
            Some(Self {
                path: self.path[..self.path.len() - 1].to_vec(),
            })
        } else {
            None
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.join("."))
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
