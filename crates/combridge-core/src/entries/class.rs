//! Class entry.
//!
//! This module provides `ClassEntry`, the analyzer's view of every C++ class,
//! struct or union. Whether a class becomes an interface or a record is not
//! stored here; it is decided by classification during generation.

use serde::{Deserialize, Serialize};

use crate::{BridgeDirections, Guid, Span, TypeRef};

use super::{FieldEntry, MethodEntry};

/// Model entry for a class, struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Class name.
    pub name: String,
    /// Direct base classes, in declaration order.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Data members, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    /// Methods, in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    /// Declared as a `union`.
    #[serde(default)]
    pub is_union: bool,
    /// Interface identifier, if one was declared.
    #[serde(default)]
    pub guid: Option<Guid>,
    /// Proxy directions requested for this class when it is an interface.
    #[serde(default)]
    pub directions: BridgeDirections,
    /// Where the class was declared.
    #[serde(default)]
    pub span: Option<Span>,
}

impl ClassEntry {
    /// Create an empty class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            is_union: false,
            guid: None,
            directions: BridgeDirections::default(),
            span: None,
        }
    }

    /// Create an empty union.
    pub fn union(name: impl Into<String>) -> Self {
        Self {
            is_union: true,
            ..Self::new(name)
        }
    }

    /// Add a direct base class.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Add a data member.
    pub fn with_field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldEntry::new(name, ty));
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodEntry) -> Self {
        self.methods.push(method);
        self
    }

    /// Set the interface identifier.
    pub fn with_guid(mut self, guid: Guid) -> Self {
        self.guid = Some(guid);
        self
    }

    /// Restrict the proxy directions.
    pub fn with_directions(mut self, directions: BridgeDirections) -> Self {
        self.directions = directions;
        self
    }

    /// Record the declaration location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Check if every method is pure virtual.
    pub fn is_abstract(&self) -> bool {
        self.methods.iter().all(|m| m.is_pure_virtual)
    }

    /// Find a method by name.
    pub fn find_method(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimitiveKind;

    #[test]
    fn class_builder() {
        let class = ClassEntry::new("IBar")
            .with_base("IFoo")
            .with_method(
                MethodEntry::new("setValue", TypeRef::ResultCode)
                    .with_param("value", TypeRef::primitive(PrimitiveKind::Int32)),
            );

        assert_eq!(class.bases, vec!["IFoo".to_string()]);
        assert!(class.is_abstract());
        assert!(class.find_method("setValue").is_some());
        assert!(class.find_method("getValue").is_none());
        assert_eq!(class.directions, BridgeDirections::BOTH);
    }

    #[test]
    fn non_pure_method_breaks_abstractness() {
        let class = ClassEntry::new("FObject")
            .with_method(MethodEntry::new("isA", TypeRef::primitive(PrimitiveKind::Bool)).non_virtual());
        assert!(!class.is_abstract());
    }

    #[test]
    fn union_builder() {
        let union = ClassEntry::union("EventData")
            .with_field("noteOn", TypeRef::named("NoteOnEvent"))
            .with_field("noteOff", TypeRef::named("NoteOffEvent"));
        assert!(union.is_union);
        assert_eq!(union.fields.len(), 2);
    }

    #[test]
    fn json_defaults() {
        let class: ClassEntry = serde_json::from_str(r#"{"name":"ViewRect"}"#).unwrap();
        assert_eq!(class, ClassEntry::new("ViewRect"));
    }
}
