// SPDX-License-Identifier: MIT

//! Synthesized environment schemas observed through the public API.

use crate::prelude::*;
use serde_json::json;
use skein_core::schema::{ConfigField, ConfigScheme, ConfigType, Shape};
use skein_defs::{
    create_environment_schema, DependencyStructure, InputDef, LeafDef, ModeDef, NodeDef,
    OutputRef, PipelineDef, StorageDef, ValueType,
};

fn shape(config_type: &ConfigType) -> &Shape {
    match &config_type.scheme {
        ConfigScheme::Shape(shape) => shape,
        other => panic!("expected shape, got {:?}", other),
    }
}

fn field_shape(field: &ConfigField) -> &Shape {
    shape(&field.config_type)
}

fn etl_pipeline() -> PipelineDef {
    let load = NodeDef::Leaf(
        LeafDef::new("load")
            .with_input(InputDef::new("path", ValueType::string()))
            .with_output(skein_defs::OutputDef::result(ValueType::int())),
    );
    let train = sink("train", "data");
    let deps =
        DependencyStructure::new().with_single("train", "data", OutputRef::new("load", "result"));
    PipelineDef::new("etl", vec![load, train], deps).unwrap()
}

#[test]
fn solids_shape_tracks_configurable_surfaces_only() {
    let pipeline = etl_pipeline();
    let schema = create_environment_schema(&pipeline, None, None).unwrap();
    let root = shape(&schema.environment_type);
    let solids = field_shape(root.get("solids").unwrap());

    // "load" needs its path from config; "train" is fed upstream but its
    // loadable input keeps an (empty) envelope present.
    let load = field_shape(solids.get("load").unwrap());
    let inputs = field_shape(load.get("inputs").unwrap());
    assert!(inputs.get("path").unwrap().is_required);
    assert!(field_shape(solids.get("train").unwrap()).is_empty());
}

#[test]
fn a_field_over_a_shape_is_required_iff_some_nested_field_is() {
    // Invariant: transitive optionality decides requiredness.
    let all_optional = ConfigField::new(ConfigType::shape(
        Shape::new().with_field("a", ConfigField::optional(ConfigType::int())),
    ));
    assert!(!all_optional.is_required);

    let one_required = ConfigField::new(ConfigType::shape(
        Shape::new()
            .with_field("a", ConfigField::optional(ConfigType::int()))
            .with_field("b", ConfigField::required(ConfigType::int())),
    ));
    assert!(one_required.is_required);
}

#[test]
fn a_selector_field_is_optional_iff_single_optional_alternative() {
    let single_optional = ConfigField::new(ConfigType::selector(
        Shape::new().with_field("only", ConfigField::optional(ConfigType::int())),
    ));
    assert!(!single_optional.is_required);

    let two_alternatives = ConfigField::new(ConfigType::selector(
        Shape::new()
            .with_field("a", ConfigField::optional(ConfigType::int()))
            .with_field("b", ConfigField::optional(ConfigType::int())),
    ));
    assert!(two_alternatives.is_required);
}

#[test]
fn default_storage_pair_requires_no_user_config() {
    let schema = create_environment_schema(&etl_pipeline(), None, None).unwrap();
    let root = shape(&schema.environment_type);
    let storage = root.get("intermediate_storage").unwrap();
    assert!(!storage.is_required);
    assert!(storage.default_value.is_none());
    // The deprecated alias stays available and optional.
    assert!(!root.get("storage").unwrap().is_required);
}

#[test]
fn custom_storage_set_defaults_to_first_fully_optional_storage() {
    let mode = ModeDef::new("default").with_intermediate_storages(vec![
        StorageDef::new("scratch", false),
        StorageDef::filesystem(),
    ]);
    let pipeline = etl_pipeline().with_modes(vec![mode]);
    let schema = create_environment_schema(&pipeline, None, None).unwrap();
    let storage = shape(&schema.environment_type)
        .get("intermediate_storage")
        .unwrap();
    assert_eq!(storage.default_value, Some(json!({"scratch": {}})));
}

#[test]
fn ignored_nodes_stay_configurable_but_optional() {
    let selection = ["load".to_string()].into();
    let schema = create_environment_schema(&etl_pipeline(), None, Some(&selection)).unwrap();
    let solids = field_shape(shape(&schema.environment_type).get("solids").unwrap());

    assert!(solids.get("load").unwrap().is_required);
    let train = solids.get("train").unwrap();
    assert!(!train.is_required);
    assert!(train.description.is_some());
}

#[test]
fn schema_is_identical_across_rebuilds() {
    let pipeline = etl_pipeline();
    let first = create_environment_schema(&pipeline, None, None).unwrap();
    let second = create_environment_schema(&pipeline, None, None).unwrap();
    assert_eq!(first.environment_type, second.environment_type);
    assert_eq!(first.environment_type.key(), second.environment_type.key());
}
