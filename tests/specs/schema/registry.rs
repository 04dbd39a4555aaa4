// SPDX-License-Identifier: MIT

//! The config type registry over a synthesized schema.

use skein_core::schema::{ConfigField, ConfigType, Shape};
use skein_defs::{
    create_environment_schema, iterate_config_types, DefinitionError, DependencyStructure,
    LeafDef, NodeDef, PipelineDef, ValueType,
};

fn named_config(name: &str) -> ConfigField {
    ConfigField::required(
        ConfigType::shape(
            Shape::new().with_field("level", ConfigField::required(ConfigType::int())),
        )
        .named(name),
    )
}

fn pipeline_of(nodes: Vec<NodeDef>) -> PipelineDef {
    PipelineDef::new("demo", nodes, DependencyStructure::new()).unwrap()
}

#[test]
fn every_reachable_type_is_in_both_indexes() {
    let node = NodeDef::Leaf(LeafDef::new("work").with_config(named_config("WorkConfig")));
    let schema = create_environment_schema(&pipeline_of(vec![node]), None, None).unwrap();

    // Walk the synthesized tree; every nested type must be in the key
    // index, and every named one in the name index.
    for config_type in iterate_config_types(&schema.environment_type) {
        assert!(schema.registry.has_key(&config_type.key()));
        if let Some(name) = &config_type.given_name {
            assert!(schema.registry.has_name(name), "missing name {}", name);
        }
    }
    assert!(schema.registry.has_name("WorkConfig"));
}

#[test]
fn loader_schemas_of_node_value_types_are_registered() {
    let row = ValueType::new("Row").with_loader(
        ConfigType::shape(
            Shape::new().with_field("csv_path", ConfigField::required(ConfigType::string())),
        )
        .named("RowLoaderConfig"),
    );
    let node = NodeDef::Leaf(
        LeafDef::new("parse").with_input(skein_defs::InputDef::new("row", row)),
    );
    let schema = create_environment_schema(&pipeline_of(vec![node]), None, None).unwrap();
    assert!(schema.registry.has_name("RowLoaderConfig"));
}

#[test]
fn name_collisions_across_variants_are_definition_errors() {
    let as_shape = ConfigType::shape(
        Shape::new().with_field("x", ConfigField::required(ConfigType::int())),
    )
    .named("Conflicted");
    let as_array = ConfigType::array(ConfigType::int()).named("Conflicted");

    let nodes = vec![
        NodeDef::Leaf(LeafDef::new("a").with_config(ConfigField::required(as_shape))),
        NodeDef::Leaf(LeafDef::new("b").with_config(ConfigField::required(as_array))),
    ];
    let err = create_environment_schema(&pipeline_of(nodes), None, None).unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateTypeName { name } if name == "Conflicted"));
}

#[test]
fn registry_contents_are_stable_across_rebuilds() {
    let node = NodeDef::Leaf(LeafDef::new("work").with_config(named_config("WorkConfig")));
    let pipeline = pipeline_of(vec![node]);
    let first = create_environment_schema(&pipeline, None, None).unwrap();
    let second = create_environment_schema(&pipeline, None, None).unwrap();

    let first_keys: Vec<&str> = first.registry.keys().collect();
    let second_keys: Vec<&str> = second.registry.keys().collect();
    assert_eq!(first_keys, second_keys);

    let first_names: Vec<&str> = first.registry.names().collect();
    let second_names: Vec<&str> = second.registry.names().collect();
    assert_eq!(first_names, second_names);
}

#[test]
fn builtin_scalars_are_always_present() {
    let schema = create_environment_schema(&pipeline_of(vec![]), None, None).unwrap();
    for name in ["String", "Int", "Float", "Bool", "Any"] {
        assert!(schema.registry.has_name(name));
        assert!(schema.registry.get_by_name(name).is_some());
    }
}
