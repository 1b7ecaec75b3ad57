//! Primitive type kinds of the foreign ABI.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive type kinds.
///
/// Character kinds are kept distinct from the integer kinds of the same
/// width so that narrow strings never get implicitly widened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Void,
    /// Stored as an explicit 1-byte integer, `true` = 1.
    Bool,
    Char8,
    Char16,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    /// Pointer-sized signed integer.
    Isize,
    /// Pointer-sized unsigned integer.
    Usize,
}

impl PrimitiveKind {
    /// Get the name of this primitive as spelled in the interface description.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char8 => "char8",
            PrimitiveKind::Char16 => "char16",
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Int64 => "int64",
            PrimitiveKind::Uint64 => "uint64",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Isize => "intptr",
            PrimitiveKind::Usize => "size",
        }
    }

    /// Size in bytes for a target with the given pointer width (in bytes).
    pub const fn size(self, pointer_width: usize) -> usize {
        match self {
            PrimitiveKind::Void => 0,
            PrimitiveKind::Bool
            | PrimitiveKind::Char8
            | PrimitiveKind::Int8
            | PrimitiveKind::Uint8 => 1,
            PrimitiveKind::Char16 | PrimitiveKind::Int16 | PrimitiveKind::Uint16 => 2,
            PrimitiveKind::Int32 | PrimitiveKind::Uint32 | PrimitiveKind::Float => 4,
            PrimitiveKind::Int64 | PrimitiveKind::Uint64 | PrimitiveKind::Double => 8,
            PrimitiveKind::Isize | PrimitiveKind::Usize => pointer_width,
        }
    }

    /// Natural alignment in bytes; equal to the size for every primitive.
    #[inline]
    pub const fn align(self, pointer_width: usize) -> usize {
        match self.size(pointer_width) {
            0 => 1,
            n => n,
        }
    }

    /// Check if this is an integer kind (booleans and characters excluded).
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Uint8
                | PrimitiveKind::Int16
                | PrimitiveKind::Uint16
                | PrimitiveKind::Int32
                | PrimitiveKind::Uint32
                | PrimitiveKind::Int64
                | PrimitiveKind::Uint64
                | PrimitiveKind::Isize
                | PrimitiveKind::Usize
        )
    }

    /// Check if this is a signed integer kind.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
                | PrimitiveKind::Isize
        )
    }

    /// Check if this is a floating point kind.
    pub const fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// Check if this kind can back an enumeration.
    pub const fn is_enum_backing(self) -> bool {
        self.is_integer() || matches!(self, PrimitiveKind::Char8 | PrimitiveKind::Char16)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_is_one_byte() {
        assert_eq!(PrimitiveKind::Bool.size(8), 1);
        assert_eq!(PrimitiveKind::Bool.align(8), 1);
    }

    #[test]
    fn pointer_sized_kinds_follow_width() {
        assert_eq!(PrimitiveKind::Usize.size(8), 8);
        assert_eq!(PrimitiveKind::Usize.size(4), 4);
        assert_eq!(PrimitiveKind::Isize.align(4), 4);
    }

    #[test]
    fn characters_are_not_integers() {
        assert!(!PrimitiveKind::Char8.is_integer());
        assert!(!PrimitiveKind::Char16.is_integer());
        assert!(PrimitiveKind::Char16.is_enum_backing());
    }

    #[test]
    fn void_has_unit_alignment() {
        assert_eq!(PrimitiveKind::Void.size(8), 0);
        assert_eq!(PrimitiveKind::Void.align(8), 1);
    }
}
