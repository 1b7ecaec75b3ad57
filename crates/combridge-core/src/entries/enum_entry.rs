//! Enum type entry.

use serde::{Deserialize, Serialize};

use crate::PrimitiveKind;

use super::EnumValue;

/// Model entry for an enumeration.
///
/// Foreign enums are plain integers on the wire, so the underlying kind is
/// part of the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumEntry {
    /// Enum name.
    pub name: String,
    /// Underlying integer kind.
    #[serde(default = "default_underlying")]
    pub underlying: PrimitiveKind,
    /// Enum values, in declaration order.
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

fn default_underlying() -> PrimitiveKind {
    PrimitiveKind::Int32
}

impl EnumEntry {
    /// Create an `int32`-backed enum with no values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            underlying: default_underlying(),
            values: Vec::new(),
        }
    }

    /// Set the underlying kind.
    pub fn with_underlying(mut self, underlying: PrimitiveKind) -> Self {
        self.underlying = underlying;
        self
    }

    /// Add a value to the enum.
    pub fn with_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.values.push(EnumValue::new(name, value));
        self
    }

    /// Look up a value by name.
    pub fn get_value(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// Look up a name by value.
    pub fn get_name(&self, value: i64) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.name.as_str())
    }
}
