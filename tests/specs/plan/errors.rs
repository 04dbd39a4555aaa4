// SPDX-License-Identifier: MIT

//! Terminal plan-time errors.

use crate::prelude::*;
use skein_defs::{
    DependencyStructure, InputDef, LeafDef, ModeDef, NodeDef, PipelineDef, ResourceDef, ValueType,
    ASSET_STORE_RESOURCE_KEY,
};
use skein_plan::{EnvironmentConfig, PlanError, StorageSelection};

#[test]
fn input_with_no_loader_dependency_or_default_is_terminal() {
    let node = NodeDef::Leaf(LeafDef::new("f").with_input(InputDef::new(
        "z",
        ValueType::new("Opaque"),
    )));
    let pipeline = PipelineDef::new("broken", vec![node], DependencyStructure::new()).unwrap();
    let err = build_plan(&pipeline, EnvironmentConfig::new()).unwrap_err();

    match &err {
        PlanError::UnsatisfiedInput { pipeline, node, input } => {
            assert_eq!(pipeline, "broken");
            assert_eq!(node, "f");
            assert_eq!(input, "z");
        }
        other => panic!("expected UnsatisfiedInput, got {:?}", other),
    }
    // The message names all three offenders.
    let message = err.to_string();
    for needle in ["broken", "f", "z"] {
        assert!(message.contains(needle), "message missing {}", needle);
    }
}

#[test]
fn customized_storage_and_asset_store_conflict() {
    let mode = ModeDef::new("default")
        .with_resource(ASSET_STORE_RESOURCE_KEY, ResourceDef::new("s3_asset_store"));
    let pipeline = PipelineDef::new("p", vec![source("a")], DependencyStructure::new())
        .unwrap()
        .with_modes(vec![mode]);
    let env =
        EnvironmentConfig::new().with_intermediate_storage(StorageSelection::new("filesystem"));

    let err = build_plan(&pipeline, env).unwrap_err();
    match err {
        PlanError::StorageAssetStoreConflict { storage } => assert_eq!(storage, "filesystem"),
        other => panic!("expected StorageAssetStoreConflict, got {:?}", other),
    }
}

#[test]
fn either_customization_alone_is_fine() {
    let custom_store_mode = ModeDef::new("default")
        .with_resource(ASSET_STORE_RESOURCE_KEY, ResourceDef::new("s3_asset_store"));
    let pipeline = PipelineDef::new("p", vec![source("a")], DependencyStructure::new())
        .unwrap()
        .with_modes(vec![custom_store_mode]);
    assert!(build_plan(&pipeline, EnvironmentConfig::new()).is_ok());

    let pipeline = PipelineDef::new("p", vec![source("a")], DependencyStructure::new()).unwrap();
    let env =
        EnvironmentConfig::new().with_intermediate_storage(StorageSelection::new("filesystem"));
    assert!(build_plan(&pipeline, env).is_ok());
}

#[test]
fn run_config_with_both_storage_spellings_is_rejected() {
    let err = EnvironmentConfig::from_value(serde_json::json!({
        "storage": {"name": "in_memory"},
        "intermediate_storage": {"name": "filesystem"}
    }))
    .unwrap_err();
    assert!(matches!(err, PlanError::ConflictingStorageFields));
}

#[test]
fn selecting_a_storage_unknown_to_the_mode_is_terminal() {
    let pipeline = PipelineDef::new("p", vec![source("a")], DependencyStructure::new()).unwrap();
    let env = EnvironmentConfig::new().with_intermediate_storage(StorageSelection::new("s3"));
    let err = build_plan(&pipeline, env).unwrap_err();
    assert!(matches!(err, PlanError::Definition(_)));
}
