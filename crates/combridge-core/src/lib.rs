//! Core types for the combridge interface bridge.
//!
//! This crate holds the Interface Description Model (IDM): the normalized,
//! immutable description of a foreign COM-style ABI that the rest of the
//! workspace consumes. It also provides the pieces shared between the
//! generator and the emitted code:
//!
//! - [`Guid`] and [`ByteOrder`] - 128-bit interface identifiers
//! - [`PrimitiveKind`] and [`TypeRef`] - type references as produced by the analyzer
//! - [`entries`] - classes, methods, enums, typedefs and constants
//! - [`BridgeDirections`] - which proxy directions an interface needs
//! - [`error`] - the error hierarchy for scanning, model building and generation
//!
//! # Example
//!
//! ```
//! use combridge_core::{ClassEntry, Guid, MethodEntry, PrimitiveKind, TypeRef};
//!
//! let foo = ClassEntry::new("IFoo")
//!     .with_guid(Guid::from_words(0x11111111, 0x22222222, 0x33333333, 0x44444444))
//!     .with_method(MethodEntry::new("getValue", TypeRef::primitive(PrimitiveKind::Int32)));
//!
//! assert_eq!(foo.methods.len(), 1);
//! assert!(foo.methods[0].is_pure_virtual);
//! ```

mod directions;
pub mod entries;
pub mod error;
mod guid;
mod primitive_kind;
mod span;
mod type_ref;

pub use directions::BridgeDirections;
pub use entries::{
    ClassEntry, ConstantEntry, ConstantValue, EnumEntry, EnumValue, FieldEntry, InterfaceEntry,
    MethodEntry, ParamEntry, TypeEntry, TypedefEntry,
};
pub use error::{BridgeError, GenerationError, ModelError, ScanError, ScanErrors};
pub use guid::{ByteOrder, Guid, GuidParseError};
pub use primitive_kind::PrimitiveKind;
pub use span::Span;
pub use type_ref::TypeRef;
