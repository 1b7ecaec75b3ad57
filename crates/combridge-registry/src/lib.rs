//! Interface Description Model storage.
//!
//! This crate turns the loose entries produced by the external header
//! analyzer into an immutable [`Idm`]: every declaration indexed by name,
//! identifiers from the declaration scanner attached to their classes, and
//! the inheritance graph checked for unknown bases and cycles.
//!
//! ```
//! use combridge_core::{ClassEntry, Guid, MethodEntry, PrimitiveKind, TypeRef};
//! use combridge_registry::IdmBuilder;
//!
//! let idm = IdmBuilder::new()
//!     .with_class(
//!         ClassEntry::new("IFoo")
//!             .with_method(MethodEntry::new("getValue", TypeRef::primitive(PrimitiveKind::Int32))),
//!     )
//!     .with_class(ClassEntry::new("IBar").with_base("IFoo"))
//!     .with_identifier("IFoo", Guid::from_words(1, 2, 3, 4))
//!     .build()
//!     .unwrap();
//!
//! let chain: Vec<_> = idm.base_chain("IBar").iter().map(|c| c.name.as_str()).collect();
//! assert_eq!(chain, ["IFoo"]);
//! ```

mod builder;
mod document;
mod idm;
mod inheritance;

pub use builder::IdmBuilder;
pub use document::{IdentifierDecl, IdmDocument};
pub use idm::Idm;
pub use inheritance::InheritanceGraph;
