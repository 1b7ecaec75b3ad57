//! Outbound lifetime: counted pointers to foreign objects.

use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::{self, NonNull};

use tracing::trace;

use crate::interface::{AddRefFn, QueryInterfaceFn, ReleaseFn, slot_of};
use crate::{QueryError, ResultCode, Unknown};

/// A counted pointer to an object that implements `I`.
///
/// Cloning calls `addRef`, dropping calls `release`, and [`cast`](Self::cast)
/// calls `queryInterface`. Methods of `I` and its bases are reached through
/// `Deref`, using the outbound traits the generator emits.
pub struct ComPtr<I: Unknown> {
    ptr: NonNull<I>,
    _marker: PhantomData<I>,
}

impl<I: Unknown> ComPtr<I> {
    /// Take ownership of one reference held by `ptr`.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a live object implementing `I` whose
    /// reference the caller owns.
    pub unsafe fn from_raw(ptr: *mut I) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self {
            ptr,
            _marker: PhantomData,
        })
    }

    /// Acquire a new reference to the object at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a live object implementing `I`.
    pub unsafe fn from_borrowed(ptr: *mut I) -> Option<Self> {
        let this = unsafe { Self::from_raw(ptr) }?;
        this.add_ref();
        Some(this)
    }

    /// The raw interface pointer, still owned by `self`.
    #[inline]
    pub fn as_ptr(&self) -> *mut I {
        self.ptr.as_ptr()
    }

    /// Give up ownership without releasing.
    pub fn into_raw(self) -> *mut I {
        let ptr = self.ptr.as_ptr();
        std::mem::forget(self);
        ptr
    }

    fn this(&self) -> *mut c_void {
        self.ptr.as_ptr().cast()
    }

    fn add_ref(&self) -> u32 {
        unsafe {
            let f = std::mem::transmute::<*const (), AddRefFn>(slot_of(self.this(), 1).as_ptr());
            f(self.this())
        }
    }

    /// Query the object for interface `J`.
    ///
    /// Returns [`QueryError::NoInterface`] when the object does not support
    /// `J`, and [`QueryError::Failed`] for any other failure code.
    pub fn cast<J: Unknown>(&self) -> Result<ComPtr<J>, QueryError> {
        let iid = J::IID.to_native_bytes();
        let mut out: *mut c_void = ptr::null_mut();
        let code = unsafe {
            let f = std::mem::transmute::<*const (), QueryInterfaceFn>(slot_of(self.this(), 0).as_ptr());
            f(self.this(), iid.as_ptr().cast(), &mut out)
        };
        if !code.is_ok() {
            trace!(from = I::NAME, to = J::NAME, %code, "query failed");
            return Err(QueryError::from_code(code));
        }
        // The callee handed over one reference in `out`.
        unsafe { ComPtr::from_raw(out.cast()) }.ok_or(QueryError::Failed(ResultCode::INTERNAL_ERROR))
    }
}

impl<I: Unknown> Deref for ComPtr<I> {
    type Target = I;

    fn deref(&self) -> &I {
        unsafe { self.ptr.as_ref() }
    }
}

impl<I: Unknown> Clone for ComPtr<I> {
    fn clone(&self) -> Self {
        self.add_ref();
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }
}

impl<I: Unknown> Drop for ComPtr<I> {
    fn drop(&mut self) {
        unsafe {
            let f = std::mem::transmute::<*const (), ReleaseFn>(slot_of(self.this(), 2).as_ptr());
            f(self.this());
        }
    }
}

impl<I: Unknown> fmt::Debug for ComPtr<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComPtr")
            .field("interface", &I::NAME)
            .field("ptr", &self.ptr)
            .finish()
    }
}
