//! `#define`-style constants.

use serde::{Deserialize, Serialize};

/// Value of a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// A narrow string literal. Emitted both as a native C string and as a
    /// pre-encoded UTF-16 array.
    Str(String),
}

/// Model entry for a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantEntry {
    /// Constant name.
    pub name: String,
    /// Constant value.
    pub value: ConstantValue,
}

impl ConstantEntry {
    /// Create a new constant.
    pub fn new(name: impl Into<String>, value: ConstantValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a string constant.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ConstantValue::Str(value.into()))
    }
}
