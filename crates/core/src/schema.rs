// SPDX-License-Identifier: MIT

//! Config primitive model: scalar fields, shapes, selectors, and arrays.
//!
//! These four primitives describe every configuration surface the engine
//! synthesizes. A [`Shape`] is a fixed-field record, a selector is a shape
//! interpreted as "exactly one field must be set", an array is an ordered
//! homogeneous sequence, and scalars are the leaves. A [`ConfigField`]
//! wraps a type with an optional default and a required flag.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar leaf kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Bool,
    Any,
}

impl ScalarKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Bool => "Bool",
            ScalarKind::Any => "Any",
        }
    }
}

/// The structural variant of a config type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigScheme {
    Scalar(ScalarKind),
    Shape(Shape),
    /// A shape of which exactly one field must be set.
    Selector(Shape),
    Array(Box<ConfigType>),
}

impl ConfigScheme {
    /// Variant discriminant name, used when comparing same-named types.
    pub fn variant_name(&self) -> &'static str {
        match self {
            ConfigScheme::Scalar(_) => "scalar",
            ConfigScheme::Shape(_) => "shape",
            ConfigScheme::Selector(_) => "selector",
            ConfigScheme::Array(_) => "array",
        }
    }
}

/// A configuration type: a structural scheme plus an optional human name.
///
/// The human name only matters for registry indexing and diagnostics;
/// structural identity is carried by [`ConfigType::key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigType {
    pub given_name: Option<String>,
    pub scheme: ConfigScheme,
}

impl ConfigType {
    pub fn scalar(kind: ScalarKind) -> Self {
        Self {
            given_name: Some(kind.type_name().to_string()),
            scheme: ConfigScheme::Scalar(kind),
        }
    }

    pub fn string() -> Self {
        Self::scalar(ScalarKind::String)
    }

    pub fn int() -> Self {
        Self::scalar(ScalarKind::Int)
    }

    pub fn float() -> Self {
        Self::scalar(ScalarKind::Float)
    }

    pub fn bool() -> Self {
        Self::scalar(ScalarKind::Bool)
    }

    pub fn any() -> Self {
        Self::scalar(ScalarKind::Any)
    }

    pub fn shape(shape: Shape) -> Self {
        Self {
            given_name: None,
            scheme: ConfigScheme::Shape(shape),
        }
    }

    pub fn selector(shape: Shape) -> Self {
        Self {
            given_name: None,
            scheme: ConfigScheme::Selector(shape),
        }
    }

    pub fn array(inner: ConfigType) -> Self {
        Self {
            given_name: None,
            scheme: ConfigScheme::Array(Box::new(inner)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.given_name = Some(name.into());
        self
    }

    /// Stable structural key. Two types with equal keys are structurally
    /// identical; field order does not contribute (keys sort field names).
    pub fn key(&self) -> String {
        match &self.scheme {
            ConfigScheme::Scalar(kind) => kind.type_name().to_string(),
            ConfigScheme::Shape(shape) => format!("Shape.{}", shape.structural_key()),
            ConfigScheme::Selector(shape) => format!("Selector.{}", shape.structural_key()),
            ConfigScheme::Array(inner) => format!("Array.{}", inner.key()),
        }
    }

    /// Transitive optionality: a shape all of whose fields are optional
    /// (vacuously true when empty), or a selector with exactly one
    /// optional field. Everything else requires a value.
    pub fn all_optional(&self) -> bool {
        match &self.scheme {
            ConfigScheme::Shape(shape) => shape.fields().values().all(|f| !f.is_required),
            ConfigScheme::Selector(shape) => {
                shape.len() == 1 && shape.fields().values().all(|f| !f.is_required)
            }
            _ => false,
        }
    }
}

/// All builtin scalar types, used to seed type registries.
pub fn builtin_config_types() -> Vec<ConfigType> {
    vec![
        ConfigType::string(),
        ConfigType::int(),
        ConfigType::float(),
        ConfigType::bool(),
        ConfigType::any(),
    ]
}

/// A fixed-field record. Field insertion order is preserved for
/// diagnostics; inserting an existing name replaces the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    fields: IndexMap<String, ConfigField>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a shape from (name, field) entries, eliding absent entries so
    /// that absence is indistinguishable from "never declared".
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<ConfigField>)>,
    {
        let mut shape = Shape::new();
        for (name, field) in entries {
            if let Some(field) = field {
                shape.fields.insert(name.into(), field);
            }
        }
        shape
    }

    pub fn with_field(mut self, name: impl Into<String>, field: ConfigField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: ConfigField) {
        self.fields.insert(name.into(), field);
    }

    pub fn fields(&self) -> &IndexMap<String, ConfigField> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&ConfigField> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn structural_key(&self) -> String {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(name, field)| {
                let marker = if field.is_required { "" } else { "?" };
                format!("{}:{}{}", name, field.config_type.key(), marker)
            })
            .collect();
        parts.sort();
        format!("{{{}}}", parts.join(","))
    }
}

/// A schema type plus an optional default and a required flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub config_type: ConfigType,
    pub default_value: Option<Value>,
    pub is_required: bool,
    pub description: Option<String>,
}

impl ConfigField {
    /// A field that is required unless its type is transitively optional.
    pub fn new(config_type: ConfigType) -> Self {
        let is_required = !config_type.all_optional();
        Self {
            config_type,
            default_value: None,
            is_required,
            description: None,
        }
    }

    pub fn required(config_type: ConfigType) -> Self {
        Self {
            config_type,
            default_value: None,
            is_required: true,
            description: None,
        }
    }

    pub fn optional(config_type: ConfigType) -> Self {
        Self {
            config_type,
            default_value: None,
            is_required: false,
            description: None,
        }
    }

    /// Attach a default; a defaulted field is never required.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self.is_required = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
