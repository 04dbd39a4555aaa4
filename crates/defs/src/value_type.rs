// SPDX-License-Identifier: MIT

//! Value types carried by node inputs and outputs.
//!
//! A value type optionally exposes a loader (the config schema used to
//! deserialize a value from the environment config) and a materializer
//! (the config schema used to persist an output). The `Nothing` kind
//! marks control-only edges that carry no value.

use serde::{Deserialize, Serialize};
use skein_core::schema::ConfigType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Regular,
    List,
    /// Control-only edge; carries no value and never produces a step input
    /// on its own.
    Nothing,
}

/// The type of a value flowing between steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueType {
    pub name: String,
    pub kind: TypeKind,
    /// Schema used to deserialize a value for this type from config.
    pub loader: Option<ConfigType>,
    /// Schema used to persist an output of this type.
    pub materializer: Option<ConfigType>,
    /// Element type, present for `List` kinds.
    pub inner: Option<Box<ValueType>>,
}

impl ValueType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Regular,
            loader: None,
            materializer: None,
            inner: None,
        }
    }

    /// A list over `inner`, the carrier type for fan-in inputs.
    pub fn list(inner: ValueType) -> Self {
        Self {
            name: format!("List[{}]", inner.name),
            kind: TypeKind::List,
            loader: None,
            materializer: None,
            inner: Some(Box::new(inner)),
        }
    }

    pub fn with_loader(mut self, schema: ConfigType) -> Self {
        self.loader = Some(schema);
        self
    }

    pub fn with_materializer(mut self, schema: ConfigType) -> Self {
        self.materializer = Some(schema);
        self
    }

    /// The type each fan-in leg carries: the element type for lists, the
    /// type itself otherwise.
    pub fn inner_type_for_fan_in(&self) -> &ValueType {
        self.inner.as_deref().unwrap_or(self)
    }

    pub fn any() -> Self {
        ValueType::new("Any").with_loader(ConfigType::any())
    }

    pub fn string() -> Self {
        ValueType::new("String").with_loader(ConfigType::string())
    }

    pub fn int() -> Self {
        ValueType::new("Int").with_loader(ConfigType::int())
    }

    pub fn float() -> Self {
        ValueType::new("Float").with_loader(ConfigType::float())
    }

    pub fn bool() -> Self {
        ValueType::new("Bool").with_loader(ConfigType::bool())
    }

    /// The control-only type: no loader, no materializer, no value.
    pub fn nothing() -> Self {
        Self {
            name: "Nothing".to_string(),
            kind: TypeKind::Nothing,
            loader: None,
            materializer: None,
            inner: None,
        }
    }
}

/// The builtin value types, included when gathering loader and
/// materializer schemas for the type registry.
pub fn builtin_value_types() -> Vec<ValueType> {
    vec![
        ValueType::any(),
        ValueType::string(),
        ValueType::int(),
        ValueType::float(),
        ValueType::bool(),
        ValueType::nothing(),
    ]
}

#[cfg(test)]
#[path = "value_type_tests.rs"]
mod tests;
