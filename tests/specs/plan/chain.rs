// SPDX-License-Identifier: MIT

//! A three-leaf chain plans into three steps with chained dependencies.

use crate::prelude::*;
use skein_defs::{DependencyStructure, OutputRef, PipelineDef};
use std::collections::BTreeSet;

fn chain() -> PipelineDef {
    let deps = DependencyStructure::new()
        .with_single("b", "x", OutputRef::new("a", "result"))
        .with_single("c", "x", OutputRef::new("b", "result"));
    PipelineDef::new("chain", vec![source("a"), sink("b", "x"), sink("c", "x")], deps).unwrap()
}

#[test]
fn chain_yields_three_steps() {
    let plan = build_default_plan(&chain());
    assert_eq!(plan.step_count(), 3);
    for key in ["a", "b", "c"] {
        assert!(plan.has_step(key), "missing step {}", key);
    }
}

#[test]
fn chain_deps_link_each_step_to_its_predecessor() {
    let plan = build_default_plan(&chain());
    let deps = plan.deps();
    assert!(deps["a"].is_empty());
    assert_eq!(deps["b"], BTreeSet::from(["a".to_string()]));
    assert_eq!(deps["c"], BTreeSet::from(["b".to_string()]));
}

#[test]
fn chain_levels_are_singletons_in_order() {
    let plan = build_default_plan(&chain());
    assert_eq!(
        plan.topological_step_levels().unwrap(),
        vec![
            vec!["a".to_string()],
            vec!["b".to_string()],
            vec!["c".to_string()],
        ]
    );
}

#[test]
fn every_leaf_maps_to_exactly_one_step() {
    let plan = build_default_plan(&chain());
    let keys: Vec<&str> = plan.steps().map(|s| s.key.as_str()).collect();
    let unique: BTreeSet<&str> = keys.iter().copied().collect();
    assert_eq!(keys.len(), unique.len());
    assert_eq!(unique, BTreeSet::from(["a", "b", "c"]));
}
