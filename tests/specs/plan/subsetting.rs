// SPDX-License-Identifier: MIT

//! Subset plans: shared step dictionary, restricted deps, idempotence.

use crate::prelude::*;
use skein_defs::{DependencyStructure, OutputRef, PipelineDef};
use skein_plan::{ExecutionPlan, PlanError};
use std::collections::BTreeSet;

fn diamond_plan() -> ExecutionPlan {
    let deps = DependencyStructure::new()
        .with_single("b", "x", OutputRef::new("a", "result"))
        .with_single("c", "x", OutputRef::new("a", "result"))
        .with_fan_in(
            "d",
            "xs",
            vec![OutputRef::new("b", "result"), OutputRef::new("c", "result")],
        );
    let pipeline = PipelineDef::new(
        "diamond",
        vec![source("a"), sink("b", "x"), sink("c", "x"), gather("d", "xs")],
        deps,
    )
    .unwrap();
    build_default_plan(&pipeline)
}

#[test]
fn full_plan_executes_every_step_by_default() {
    let plan = diamond_plan();
    assert_eq!(
        plan.step_keys_to_execute(),
        &["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()]
    );
}

#[test]
fn subset_keeps_the_full_step_dictionary() {
    let plan = diamond_plan();
    let subset = plan
        .build_subset_plan(vec!["b".to_string(), "d".to_string()])
        .unwrap();
    // Lookups still see every step; only the execution set shrinks.
    assert_eq!(subset.step_count(), 4);
    assert_eq!(subset.step_keys_to_execute(), &["b".to_string(), "d".to_string()]);
}

#[test]
fn execution_deps_are_restricted_to_the_subset() {
    let plan = diamond_plan();
    let subset = plan
        .build_subset_plan(vec!["b".to_string(), "d".to_string()])
        .unwrap();
    let deps = subset.execution_deps();
    assert_eq!(deps.len(), 2);
    assert!(deps["b"].is_empty());
    assert_eq!(deps["d"], BTreeSet::from(["b".to_string()]));
}

#[test]
fn subsetting_twice_with_the_same_keys_is_idempotent() {
    let plan = diamond_plan();
    let keys = vec!["b".to_string(), "d".to_string()];
    let once = plan.build_subset_plan(keys.clone()).unwrap();
    let twice = once.build_subset_plan(keys).unwrap();

    assert_eq!(once.step_keys_to_execute(), twice.step_keys_to_execute());
    assert_eq!(once.execution_deps(), twice.execution_deps());
    assert_eq!(
        once.execution_step_levels().unwrap(),
        twice.execution_step_levels().unwrap()
    );
}

#[test]
fn unknown_keys_in_a_subset_are_rejected_listing_the_missing() {
    let plan = diamond_plan();
    let err = plan
        .build_subset_plan(vec!["a".to_string(), "nope".to_string(), "also_nope".to_string()])
        .unwrap_err();
    match err {
        PlanError::StepsNotFound { keys } => {
            assert_eq!(keys, vec!["nope".to_string(), "also_nope".to_string()]);
        }
        other => panic!("expected StepsNotFound, got {:?}", other),
    }
}
