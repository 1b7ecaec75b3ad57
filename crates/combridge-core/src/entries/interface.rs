//! Interface entry.
//!
//! This module provides `InterfaceEntry`, the validated view of a class that
//! classification decided is an interface: exactly one identifier, at most one
//! base, only pure virtual methods.

use crate::{BridgeDirections, Guid};

use super::MethodEntry;

/// A class classified as an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceEntry {
    /// Interface name.
    pub name: String,
    /// Interface identifier.
    pub guid: Guid,
    /// The single base interface, `None` for a root.
    pub base: Option<String>,
    /// Own methods in declaration order; these occupy consecutive vtable slots
    /// after every slot of the base chain.
    pub methods: Vec<MethodEntry>,
    /// Proxy directions to generate.
    pub directions: BridgeDirections,
}

impl InterfaceEntry {
    /// Create an interface entry with no methods.
    pub fn new(name: impl Into<String>, guid: Guid) -> Self {
        Self {
            name: name.into(),
            guid,
            base: None,
            methods: Vec::new(),
            directions: BridgeDirections::default(),
        }
    }

    /// Set the base interface.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodEntry) -> Self {
        self.methods.push(method);
        self
    }

    /// Number of methods this interface declares itself.
    pub fn own_method_count(&self) -> usize {
        self.methods.len()
    }

    /// Check if this interface has no base.
    pub fn is_root(&self) -> bool {
        self.base.is_none()
    }
}
