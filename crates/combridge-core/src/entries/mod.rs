//! Interface description model entries.
//!
//! This module provides the entry types the header analyzer produces:
//!
//! - [`TypeEntry`] - Unified enum wrapping all named type entries
//! - [`ClassEntry`] - Every C++ class, struct or union, before classification
//! - [`EnumEntry`] - Enumeration types
//! - [`TypedefEntry`] - Typedefs to arrays, pointers and scalars
//! - [`ConstantEntry`] - `#define`-style constants
//!
//! Supporting types:
//! - [`MethodEntry`], [`ParamEntry`] - Method signatures
//! - [`FieldEntry`], [`EnumValue`] - Member types
//! - [`InterfaceEntry`] - The validated view of a class classified as an interface

mod class;
mod common;
mod constant;
mod enum_entry;
mod interface;
mod method;
mod type_entry;
mod typedef;

pub use class::ClassEntry;
pub use common::{EnumValue, FieldEntry};
pub use constant::{ConstantEntry, ConstantValue};
pub use enum_entry::EnumEntry;
pub use interface::InterfaceEntry;
pub use method::{MethodEntry, ParamEntry};
pub use type_entry::TypeEntry;
pub use typedef::TypedefEntry;
