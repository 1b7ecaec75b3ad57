//! combridge - bindings for COM-style foreign ABIs.
//!
//! Given an interface description of a foreign plug-in ABI (interfaces with
//! single inheritance and 128-bit identifiers, plain records and unions,
//! enums, typedefs and constants), combridge generates Rust source that
//! bridges every interface in both directions:
//!
//! - **outbound**: call methods of foreign objects through their vtables
//! - **inbound**: expose Rust types to foreign callers through
//!   vtables populated with panic-safe trampolines
//!
//! The work is split across the workspace:
//!
//! - [`core`] - the interface description model and error types
//! - [`parser`] - identifier and constant scanning of header text
//! - [`registry`] - model validation and storage
//! - [`codegen`] - layout, slot allocation and emission
//! - [`runtime`] - what generated code links against
//!
//! Most users only need [`BindingUnit`].

mod unit;

pub use unit::BindingUnit;

pub use combridge_codegen as codegen;
pub use combridge_core as core;
pub use combridge_parser as parser;
pub use combridge_registry as registry;
pub use combridge_runtime as runtime;

pub mod prelude {
    pub use crate::BindingUnit;
    pub use combridge_codegen::{GeneratedBindings, GeneratorConfig, ItemKind, generate};
    pub use combridge_core::{
        BridgeDirections, BridgeError, ClassEntry, ConstantEntry, EnumEntry, Guid, MethodEntry,
        PrimitiveKind, TypeRef, TypedefEntry,
    };
    pub use combridge_registry::{Idm, IdmBuilder};
}
