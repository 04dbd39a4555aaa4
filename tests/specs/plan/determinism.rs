// SPDX-License-Identifier: MIT

//! Plans are pure functions of their inputs: rebuilds are identical and
//! the dependency graph is always a DAG.

use crate::prelude::*;
use skein_defs::{DependencyStructure, GraphDef, NodeDef, OutputDef, OutputRef, PipelineDef, ValueType};
use std::collections::BTreeSet;

/// A pipeline mixing a graph, a diamond, and a fan-in.
fn busy_pipeline() -> PipelineDef {
    let inner = GraphDef::new(
        "prep",
        vec![source("fetch"), sink("clean", "x")],
        DependencyStructure::new().with_single("clean", "x", OutputRef::new("fetch", "result")),
    )
    .unwrap()
    .with_output_mapping(OutputDef::new("out", ValueType::int()), "clean", "result")
    .unwrap();

    let deps = DependencyStructure::new()
        .with_single("left", "x", OutputRef::new("prep", "out"))
        .with_single("right", "x", OutputRef::new("prep", "out"))
        .with_fan_in(
            "merge",
            "xs",
            vec![OutputRef::new("left", "result"), OutputRef::new("right", "result")],
        );
    PipelineDef::new(
        "busy",
        vec![
            NodeDef::Graph(inner),
            sink("left", "x"),
            sink("right", "x"),
            gather("merge", "xs"),
        ],
        deps,
    )
    .unwrap()
}

#[test]
fn rebuilding_produces_identical_keys_edges_and_levels() {
    let pipeline = busy_pipeline();
    let first = build_default_plan(&pipeline);
    let second = build_default_plan(&pipeline);

    let first_keys: Vec<&str> = first.steps().map(|s| s.key.as_str()).collect();
    let second_keys: Vec<&str> = second.steps().map(|s| s.key.as_str()).collect();
    assert_eq!(first_keys, second_keys);
    assert_eq!(first.deps(), second.deps());
    assert_eq!(
        first.topological_step_levels().unwrap(),
        second.topological_step_levels().unwrap()
    );
}

#[test]
fn every_edge_endpoint_is_a_known_step() {
    let plan = build_default_plan(&busy_pipeline());
    for (key, upstream) in plan.deps() {
        assert!(plan.has_step(key));
        for dep in upstream {
            assert!(plan.has_step(dep), "{} depends on unknown {}", key, dep);
        }
    }
}

#[test]
fn the_dependency_graph_is_acyclic() {
    let plan = build_default_plan(&busy_pipeline());
    // A layered sort exists iff the graph has no cycles.
    let levels = plan.topological_step_levels().unwrap();
    let total: usize = levels.iter().map(|level| level.len()).sum();
    assert_eq!(total, plan.step_count());
}

#[test]
fn levels_sort_keys_lexicographically() {
    let plan = build_default_plan(&busy_pipeline());
    for level in plan.topological_step_levels().unwrap() {
        let mut sorted = level.clone();
        sorted.sort();
        assert_eq!(level, sorted);
    }
}

#[test]
fn steps_appear_after_everything_they_depend_on() {
    let plan = build_default_plan(&busy_pipeline());
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for key in plan.topological_step_keys().unwrap() {
        if let Some(step) = plan.get_step_by_key(&key) {
            for dep in step.dependency_keys() {
                assert!(seen.contains(dep), "{} planned before its dep {}", key, dep);
            }
        }
        if let Some((stored, _)) = plan.deps().get_key_value(&key) {
            seen.insert(stored.as_str());
        }
    }
}
