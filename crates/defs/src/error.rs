// SPDX-License-Identifier: MIT

//! Definition-time errors

use thiserror::Error;

/// Problems detected while constructing definitions or synthesizing the
/// environment config schema. All of these are terminal for the build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("duplicate node name \"{node}\" in {container}")]
    DuplicateNodeName { container: String, node: String },

    #[error("in {container}, dependency references unknown node \"{node}\"")]
    UnknownDependencyNode { container: String, node: String },

    #[error("in {container}, node \"{node}\" has no input named \"{input}\"")]
    UnknownInput {
        container: String,
        node: String,
        input: String,
    },

    #[error("in {container}, node \"{node}\" has no output named \"{output}\"")]
    UnknownOutput {
        container: String,
        node: String,
        output: String,
    },

    #[error("circular dependency in {container} among: {}", nodes.join(", "))]
    CircularDependency {
        container: String,
        nodes: Vec<String>,
    },

    #[error("pipeline \"{pipeline}\" has no mode named \"{mode}\"")]
    UnknownMode { pipeline: String, mode: String },

    #[error("mode \"{mode}\" has no intermediate storage named \"{storage}\"")]
    UnknownStorage { mode: String, storage: String },

    #[error(
        "type names must be unique; two different kinds of types share the name \"{name}\""
    )]
    DuplicateTypeName { name: String },
}
