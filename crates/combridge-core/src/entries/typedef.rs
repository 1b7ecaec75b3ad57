//! Typedef entry.

use serde::{Deserialize, Serialize};

use crate::TypeRef;

/// Model entry for a typedef.
///
/// Typedefs to arrays become inline-array records and typedefs to pointers or
/// scalars become single-field wrappers; both keep the typedef's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefEntry {
    /// Typedef name.
    pub name: String,
    /// The aliased type.
    pub target: TypeRef,
}

impl TypedefEntry {
    /// Create a new typedef.
    pub fn new(name: impl Into<String>, target: TypeRef) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Check if the typedef names a fixed-size array.
    pub fn is_array(&self) -> bool {
        matches!(self.target, TypeRef::Array { .. })
    }
}
