//! Method signatures.

use serde::{Deserialize, Serialize};

use crate::TypeRef;

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamEntry {
    /// Parameter name.
    pub name: String,
    /// Parameter type as declared.
    pub ty: TypeRef,
    /// The callee writes through this parameter.
    #[serde(default)]
    pub is_output: bool,
}

impl ParamEntry {
    /// Create an input parameter.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_output: false,
        }
    }

    /// Create an output parameter.
    pub fn output(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_output: true,
        }
    }
}

/// A method declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodEntry {
    /// Method name.
    pub name: String,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    /// Declared `virtual ... = 0`.
    #[serde(default = "default_pure_virtual")]
    pub is_pure_virtual: bool,
}

fn default_pure_virtual() -> bool {
    true
}

impl MethodEntry {
    /// Create a pure virtual method with no parameters.
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            return_type,
            params: Vec::new(),
            is_pure_virtual: true,
        }
    }

    /// Add an input parameter.
    pub fn with_param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(ParamEntry::new(name, ty));
        self
    }

    /// Add an output parameter.
    pub fn with_output(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(ParamEntry::output(name, ty));
        self
    }

    /// Mark the method as having a body (not pure virtual).
    pub fn non_virtual(mut self) -> Self {
        self.is_pure_virtual = false;
        self
    }

    /// Check if the method returns the ABI result code.
    pub fn returns_result_code(&self) -> bool {
        matches!(self.return_type, TypeRef::ResultCode)
    }
}
