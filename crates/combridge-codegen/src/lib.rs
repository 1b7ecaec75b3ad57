//! Binding generator for combridge.
//!
//! Takes a built [`Idm`](combridge_registry::Idm) and produces Rust source
//! that bridges each interface in both directions:
//!
//! - **Classification** ([`ClassKind`]) - interface or record
//! - **Layout** ([`LayoutResolver`]) - field offsets, sizes and alignment
//! - **Slots** ([`SlotAllocator`]) - root-first vtable slot assignment
//! - **Emission** - records, enums, constants, proxies, trampolines and vtable
//!   initializers, rendered as one deterministic source file
//!
//! # Example
//!
//! ```
//! use combridge_codegen::{GeneratorConfig, generate};
//! use combridge_core::{ClassEntry, Guid, MethodEntry, PrimitiveKind, TypeRef};
//! use combridge_registry::IdmBuilder;
//!
//! let idm = IdmBuilder::new()
//!     .with_class(
//!         ClassEntry::new("IFoo")
//!             .with_guid(Guid::from_words(0x11111111, 0x22222222, 0x33333333, 0x44444444))
//!             .with_method(MethodEntry::new("getValue", TypeRef::primitive(PrimitiveKind::Int32))),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let config = GeneratorConfig::new().without_root_interface();
//! let bindings = generate(&idm, &config).unwrap();
//! assert_eq!(bindings.interface("IFoo").unwrap().slots.total(), 1);
//! assert!(bindings.source().contains("IFoo_getValue"));
//! ```

mod classify;
mod config;
mod context;
mod emit;
mod generator;
mod layout;
mod names;
mod output;
mod plan;
mod slots;

pub use classify::ClassKind;
pub use config::{DirectionPolicy, GeneratorConfig, IdentityMethods};
pub use context::GenerationContext;
pub use generator::{Generator, generate};
pub use layout::{FieldLayout, LayoutResolver, LayoutType, RecordId, RecordKind, RecordLayout, size_align};
pub use output::{GeneratedBindings, GeneratedItem, HEADER, InterfaceSummary, ItemKind};
pub use plan::{IdentityRole, InterfacePlan, MethodPlan, ParamPlan, plan_interface};
pub use slots::{SlotAllocation, SlotAllocator, VtableSlot};
