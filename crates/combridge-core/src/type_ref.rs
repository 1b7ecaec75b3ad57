//! Type references as produced by the header analyzer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PrimitiveKind;

/// A reference to a type in the interface description.
///
/// C++ references (`T&`) arrive already normalized to pointers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A built-in primitive.
    Primitive(PrimitiveKind),
    /// A pointer. `is_const` marks `const T*`.
    Pointer {
        pointee: Box<TypeRef>,
        #[serde(default)]
        is_const: bool,
    },
    /// A fixed-size inline array `T[N]`.
    Array { element: Box<TypeRef>, len: usize },
    /// A class (record or interface), enum or typedef, by name.
    Named(String),
    /// The ABI's result-code type.
    ResultCode,
    /// A construct the analyzer could not normalize, with its original spelling.
    Unsupported(String),
}

impl TypeRef {
    /// A primitive type.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }

    /// The `void` type.
    pub fn void() -> Self {
        TypeRef::Primitive(PrimitiveKind::Void)
    }

    /// A named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// A mutable pointer to `pointee`.
    pub fn ptr(pointee: TypeRef) -> Self {
        TypeRef::Pointer {
            pointee: Box::new(pointee),
            is_const: false,
        }
    }

    /// A const pointer to `pointee`.
    pub fn const_ptr(pointee: TypeRef) -> Self {
        TypeRef::Pointer {
            pointee: Box::new(pointee),
            is_const: true,
        }
    }

    /// A fixed-size array of `len` elements.
    pub fn array(element: TypeRef, len: usize) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            len,
        }
    }

    /// Check if this is `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Void))
    }

    /// Check if this is a pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeRef::Pointer { .. })
    }

    /// The name referenced by this type, looking through pointers and arrays.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Pointer { pointee, .. } => pointee.referenced_name(),
            TypeRef::Array { element, .. } => element.referenced_name(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => write!(f, "{kind}"),
            TypeRef::Pointer { pointee, is_const } => {
                if *is_const {
                    write!(f, "const {pointee}*")
                } else {
                    write!(f, "{pointee}*")
                }
            }
            TypeRef::Array { element, len } => write!(f, "{element}[{len}]"),
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::ResultCode => write!(f, "tresult"),
            TypeRef::Unsupported(spelling) => write!(f, "{spelling}"),
        }
    }
}
