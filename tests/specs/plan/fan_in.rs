// SPDX-License-Identifier: MIT

//! Fan-in inputs resolve to multiple checked upstream sources.

use crate::prelude::*;
use skein_defs::{DependencyStructure, OutputRef, PipelineDef};
use skein_plan::{StepInputSource, StepOutputHandle};

fn fan_in_pipeline() -> PipelineDef {
    let deps = DependencyStructure::new().with_fan_in(
        "c",
        "xs",
        vec![OutputRef::new("a", "result"), OutputRef::new("b", "result")],
    );
    PipelineDef::new(
        "fan",
        vec![source("a"), source("b"), gather("c", "xs")],
        deps,
    )
    .unwrap()
}

#[test]
fn fan_in_resolves_to_from_multiple_sources() {
    let plan = build_default_plan(&fan_in_pipeline());
    let step = plan.get_step_by_key("c").unwrap();
    assert_eq!(step.step_inputs.len(), 1);

    let input = step.step_input_named("xs").unwrap();
    match &input.source {
        StepInputSource::FromMultipleSources { sources } => {
            assert_eq!(sources.len(), 2);
            assert_eq!(
                sources[0].step_output_handle,
                StepOutputHandle::new("a", "result")
            );
            assert_eq!(
                sources[1].step_output_handle,
                StepOutputHandle::new("b", "result")
            );
            assert!(sources.iter().all(|leg| leg.check_for_missing));
        }
        other => panic!("expected FromMultipleSources, got {:?}", other),
    }
}

#[test]
fn fan_in_legs_carry_the_element_type() {
    let plan = build_default_plan(&fan_in_pipeline());
    let input = plan.get_step_by_key("c").unwrap().step_input_named("xs").unwrap();
    assert_eq!(input.value_type.name, "List[Int]");
    match &input.source {
        StepInputSource::FromMultipleSources { sources } => {
            assert!(sources.iter().all(|leg| leg.value_type.name == "Int"));
        }
        other => panic!("expected FromMultipleSources, got {:?}", other),
    }
}

#[test]
fn fan_in_contributes_both_edges() {
    let plan = build_default_plan(&fan_in_pipeline());
    let upstream = &plan.deps()["c"];
    assert!(upstream.contains("a"));
    assert!(upstream.contains("b"));
    assert_eq!(
        plan.topological_step_levels().unwrap(),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ]
    );
}
