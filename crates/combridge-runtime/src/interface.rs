//! Interface traits and vtable slots.
//!
//! Generated proxies are `#[repr(C)]` structs whose only field is a pointer
//! to an array of [`Slot`]s. Slots are laid out root first: every slot of the
//! base chain comes before the interface's own methods.

use std::ffi::c_void;

use crate::{Guid, ResultCode};

/// One vtable entry: an untyped function pointer.
///
/// Generated code stores `extern "system"` functions here and reinterprets
/// them as their declared function-pointer type when calling.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(*const ());

// Slots only ever hold pointers to immutable code.
unsafe impl Send for Slot {}
unsafe impl Sync for Slot {}

impl Slot {
    /// An empty slot.
    pub const NULL: Slot = Slot(std::ptr::null());

    /// Wrap a function pointer cast to `*const ()`.
    #[inline]
    pub const fn new(function: *const ()) -> Self {
        Slot(function)
    }

    #[inline]
    pub const fn as_ptr(self) -> *const () {
        self.0
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

/// A foreign interface with a fixed vtable layout.
///
/// # Safety
///
/// The implementing type must be a `#[repr(C)]` struct whose first field is
/// a `*const Slot` pointing to at least `SLOT_COUNT` slots, and the
/// constants must describe the foreign layout exactly.
pub unsafe trait Interface: Sized + 'static {
    /// Interface identifier.
    const IID: Guid;
    /// Interface name as declared.
    const NAME: &'static str;
    /// Slots occupied by the whole base chain.
    const BASE_SLOT_COUNT: usize;
    /// Total slots: base chain plus own methods.
    const SLOT_COUNT: usize;

    /// Whether `iid` names this interface or one of its bases.
    fn inherits(iid: &Guid) -> bool;
}

/// Marks `Self` as `I` or a descendant of `I`.
///
/// A pointer to `Self` can be used wherever a pointer to `I` is expected
/// because the first `I::SLOT_COUNT` slots are identical.
///
/// # Safety
///
/// `Self`'s vtable must start with `I`'s vtable.
pub unsafe trait Inherits<I: Interface>: Interface {}

unsafe impl<I: Interface> Inherits<I> for I {}

/// Interfaces whose first three slots are `queryInterface`, `addRef` and
/// `release` with the standard signatures.
///
/// # Safety
///
/// Slots 0, 1 and 2 must be [`QueryInterfaceFn`], [`AddRefFn`] and
/// [`ReleaseFn`].
pub unsafe trait Unknown: Interface {}

/// `queryInterface(this, iid, out)`; `iid` points to the 16 identifier bytes.
pub type QueryInterfaceFn =
    unsafe extern "system" fn(this: *mut c_void, iid: *const c_void, out: *mut *mut c_void) -> ResultCode;
/// `addRef(this)`, returning the new count.
pub type AddRefFn = unsafe extern "system" fn(this: *mut c_void) -> u32;
/// `release(this)`, returning the new count.
pub type ReleaseFn = unsafe extern "system" fn(this: *mut c_void) -> u32;

/// Read the vtable pointer stored at `this`.
///
/// # Safety
///
/// `this` must point to a live proxy.
#[inline]
pub unsafe fn vtable_of(this: *const c_void) -> *const Slot {
    unsafe { *(this as *const *const Slot) }
}

/// Read slot `index` of the vtable stored at `this`.
///
/// # Safety
///
/// `this` must point to a live proxy with more than `index` slots.
#[inline]
pub unsafe fn slot_of(this: *const c_void, index: usize) -> Slot {
    unsafe { *vtable_of(this).add(index) }
}
