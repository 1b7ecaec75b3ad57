//! TypeEntry enum for unified type storage.
//!
//! This module provides `TypeEntry`, a single enum that wraps every named type
//! entry kind for unified storage and lookup in the model.

use serde::{Deserialize, Serialize};

use crate::Span;

use super::{ClassEntry, EnumEntry, TypedefEntry};

/// Unified type entry for model storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum TypeEntry {
    /// Class, struct or union.
    Class(ClassEntry),
    /// Enumeration.
    Enum(EnumEntry),
    /// Typedef.
    Typedef(TypedefEntry),
}

impl TypeEntry {
    /// Get the entry's name.
    pub fn name(&self) -> &str {
        match self {
            TypeEntry::Class(e) => &e.name,
            TypeEntry::Enum(e) => &e.name,
            TypeEntry::Typedef(e) => &e.name,
        }
    }

    /// Where the entry was declared, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            TypeEntry::Class(e) => e.span,
            TypeEntry::Enum(_) | TypeEntry::Typedef(_) => None,
        }
    }

    /// Human-readable kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeEntry::Class(e) if e.is_union => "union",
            TypeEntry::Class(_) => "class",
            TypeEntry::Enum(_) => "enum",
            TypeEntry::Typedef(_) => "typedef",
        }
    }

    // === Type Checks ===

    /// Check if this is a class.
    pub fn is_class(&self) -> bool {
        matches!(self, TypeEntry::Class(_))
    }

    /// Check if this is an enum.
    pub fn is_enum(&self) -> bool {
        matches!(self, TypeEntry::Enum(_))
    }

    /// Check if this is a typedef.
    pub fn is_typedef(&self) -> bool {
        matches!(self, TypeEntry::Typedef(_))
    }

    // === Downcasts ===

    /// Get as a class entry.
    pub fn as_class(&self) -> Option<&ClassEntry> {
        match self {
            TypeEntry::Class(e) => Some(e),
            _ => None,
        }
    }

    /// Get as a mutable class entry.
    pub fn as_class_mut(&mut self) -> Option<&mut ClassEntry> {
        match self {
            TypeEntry::Class(e) => Some(e),
            _ => None,
        }
    }

    /// Get as an enum entry.
    pub fn as_enum(&self) -> Option<&EnumEntry> {
        match self {
            TypeEntry::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Get as a typedef entry.
    pub fn as_typedef(&self) -> Option<&TypedefEntry> {
        match self {
            TypeEntry::Typedef(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClassEntry> for TypeEntry {
    fn from(entry: ClassEntry) -> Self {
        TypeEntry::Class(entry)
    }
}

impl From<EnumEntry> for TypeEntry {
    fn from(entry: EnumEntry) -> Self {
        TypeEntry::Enum(entry)
    }
}

impl From<TypedefEntry> for TypeEntry {
    fn from(entry: TypedefEntry) -> Self {
        TypeEntry::Typedef(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PrimitiveKind, TypeRef};

    #[test]
    fn entry_kinds() {
        let class: TypeEntry = ClassEntry::new("IFoo").into();
        let union: TypeEntry = ClassEntry::union("U").into();
        let en: TypeEntry = EnumEntry::new("E").into();
        let td: TypeEntry =
            TypedefEntry::new("String128", TypeRef::array(TypeRef::primitive(PrimitiveKind::Char16), 128)).into();

        assert_eq!(class.kind_name(), "class");
        assert_eq!(union.kind_name(), "union");
        assert_eq!(en.kind_name(), "enum");
        assert_eq!(td.kind_name(), "typedef");
        assert!(td.as_typedef().unwrap().is_array());
        assert!(class.as_enum().is_none());
    }

    #[test]
    fn tagged_json() {
        let entry: TypeEntry =
            serde_json::from_str(r#"{"entry":"enum","name":"Flags","values":[{"name":"kA","value":1}]}"#)
                .unwrap();
        assert_eq!(entry.name(), "Flags");
        assert_eq!(entry.as_enum().unwrap().get_value("kA"), Some(1));
    }
}
