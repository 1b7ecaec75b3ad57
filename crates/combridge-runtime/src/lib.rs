//! Runtime support for generated combridge bindings.
//!
//! Generated code links against this crate for everything that is the same
//! across interfaces:
//!
//! - [`Slot`], [`Interface`], [`Inherits`], [`Unknown`] - vtable layout contracts
//! - [`ResultCode`] and [`QueryError`] - foreign status codes
//! - [`ComPtr`] - outbound lifetime (`addRef` / `release` / `queryInterface` on
//!   foreign objects)
//! - [`ComObject`], [`ComRef`], [`Class`] - inbound identity and lifetime for
//!   Rust objects exposed to the host
//! - [`guard`] - panic containment for inbound trampolines
//!
//! Reference counts are atomic; objects may be shared across threads.

mod com_ptr;
mod guard;
mod interface;
mod object;
mod result;

pub use combridge_core::{ByteOrder, Guid};

pub use com_ptr::ComPtr;
pub use guard::guard;
pub use interface::{
    AddRefFn, Inherits, Interface, QueryInterfaceFn, ReleaseFn, Slot, Unknown, slot_of, vtable_of,
};
pub use object::{Class, ComObject, ComRef, InterfaceBinding};
pub use result::{QueryError, ResultCode};
