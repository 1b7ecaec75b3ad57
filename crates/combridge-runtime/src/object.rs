//! Inbound identity and lifetime: Rust objects exposed through vtables.
//!
//! A [`ComObject`] owns a Rust value plus one *head* per implemented
//! interface. A head is what foreign code holds as `this`: the vtable pointer
//! followed by a back pointer to the owning object, so trampolines find the
//! implementation in constant time.
//!
//! ```text
//!  this ──► Head { vtbl ──► [slot 0, slot 1, ...], owner ──► ComObject<C> }
//! ```
//!
//! Vtables are built once per implementing type and shared by every object
//! of that type.

use std::any::{TypeId, type_name};
use std::ffi::c_void;
use std::fmt;
use std::ops::Deref;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicU32, Ordering, fence};
use std::sync::{Mutex, OnceLock};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{ComPtr, Guid, Interface, ResultCode, Slot, Unknown};

/// How one interface of a class is wired up.
///
/// Generated code produces these through `<Interface>::binding::<C>()`.
#[derive(Clone, Copy)]
pub struct InterfaceBinding {
    pub iid: Guid,
    pub name: &'static str,
    pub slot_count: usize,
    pub inherits: fn(&Guid) -> bool,
    pub init: fn(&mut [Slot]),
}

impl InterfaceBinding {
    /// Binding for interface `I` with a vtable initializer.
    pub fn new<I: Interface>(init: fn(&mut [Slot])) -> Self {
        Self {
            iid: I::IID,
            name: I::NAME,
            slot_count: I::SLOT_COUNT,
            inherits: I::inherits,
            init,
        }
    }
}

impl fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("iid", &self.iid)
            .field("name", &self.name)
            .field("slot_count", &self.slot_count)
            .finish()
    }
}

/// A Rust type that implements foreign interfaces.
///
/// The order of [`interfaces`](Self::interfaces) matters: the first entry
/// answers queries for shared bases such as the identity root, so the same
/// pointer is returned for them every time.
pub trait Class: Send + Sync + Sized + 'static {
    fn interfaces() -> Vec<InterfaceBinding>;
}

struct VtableEntry {
    iid: Guid,
    name: &'static str,
    inherits: fn(&Guid) -> bool,
    slots: &'static [Slot],
}

/// Every vtable of one class.
struct ClassVtables {
    entries: Vec<VtableEntry>,
}

static VTABLES: OnceLock<Mutex<FxHashMap<TypeId, &'static ClassVtables>>> = OnceLock::new();

fn vtables_for<C: Class>() -> &'static ClassVtables {
    let cache = VTABLES.get_or_init(Default::default);
    let mut cache = cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.entry(TypeId::of::<C>()).or_insert_with(|| {
        let entries = C::interfaces()
            .into_iter()
            .map(|binding| {
                let mut slots = vec![Slot::NULL; binding.slot_count];
                (binding.init)(&mut slots);
                debug_assert!(
                    slots.iter().all(|s| !s.is_null()),
                    "{} left empty slots in {}",
                    type_name::<C>(),
                    binding.name
                );
                VtableEntry {
                    iid: binding.iid,
                    name: binding.name,
                    inherits: binding.inherits,
                    slots: Box::leak(slots.into_boxed_slice()),
                }
            })
            .collect();
        debug!(class = type_name::<C>(), "built vtables");
        Box::leak(Box::new(ClassVtables { entries }))
    })
}

#[repr(C)]
struct Head {
    vtbl: *const Slot,
    owner: *const c_void,
}

/// A reference-counted Rust object exposed to foreign code.
pub struct ComObject<C: Class> {
    heads: Box<[Head]>,
    vtables: &'static ClassVtables,
    refcount: AtomicU32,
    value: C,
}

impl<C: Class> ComObject<C> {
    /// Allocate an object with a reference count of one.
    fn allocate(value: C) -> NonNull<Self> {
        let vtables = vtables_for::<C>();
        let heads = vtables
            .entries
            .iter()
            .map(|entry| Head {
                vtbl: entry.slots.as_ptr(),
                owner: ptr::null(),
            })
            .collect();
        let raw = Box::into_raw(Box::new(Self {
            heads,
            vtables,
            refcount: AtomicU32::new(1),
            value,
        }));
        // Not shared yet: wire the back pointers.
        let object = unsafe { &mut *raw };
        for head in object.heads.iter_mut() {
            head.owner = raw as *const c_void;
        }
        trace!(class = type_name::<C>(), "object created");
        // Box::into_raw never returns null.
        unsafe { NonNull::new_unchecked(raw) }
    }

    /// Recover the object from a foreign `this` pointer.
    ///
    /// # Safety
    ///
    /// `this` must be a head pointer handed out by an object of type
    /// `ComObject<C>` that is still alive for `'a`.
    #[inline]
    pub unsafe fn from_this<'a>(this: *mut c_void) -> &'a Self {
        unsafe {
            let head = &*(this as *const Head);
            &*(head.owner as *const Self)
        }
    }

    /// The wrapped value.
    #[inline]
    pub fn get(&self) -> &C {
        &self.value
    }

    /// Current reference count.
    pub fn ref_count(&self) -> u32 {
        self.refcount.load(Ordering::Relaxed)
    }

    /// Acquire a reference; returns the new count.
    pub fn add_ref(&self) -> u32 {
        let old = self.refcount.fetch_add(1, Ordering::Relaxed);
        debug_assert!(old < u32::MAX, "refcount overflow");
        old + 1
    }

    /// Release a reference, destroying the object on the last one.
    ///
    /// # Safety
    ///
    /// The caller must own the reference being released and must not use
    /// `this` afterwards unless it holds another reference.
    pub unsafe fn release(this: *const Self) -> u32 {
        let old = unsafe { (&*this).refcount.fetch_sub(1, Ordering::Release) };
        debug_assert!(old > 0, "refcount underflow");
        if old == 1 {
            fence(Ordering::Acquire);
            unsafe { Self::destroy(this) };
        }
        old - 1
    }

    #[cold]
    #[inline(never)]
    unsafe fn destroy(this: *const Self) {
        trace!(class = type_name::<C>(), "object destroyed");
        drop(unsafe { Box::from_raw(this as *mut Self) });
    }

    /// Head pointer for the first interface that is or derives from `iid`.
    pub fn find(&self, iid: &Guid) -> Option<*mut c_void> {
        self.vtables
            .entries
            .iter()
            .position(|entry| (entry.inherits)(iid))
            .map(|idx| &self.heads[idx] as *const Head as *mut c_void)
    }

    /// Names of the implemented interfaces, in binding order.
    pub fn interface_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.vtables.entries.iter().map(|e| e.name)
    }

    /// Exact-match lookup by interface identifier.
    pub fn implements(&self, iid: &Guid) -> bool {
        self.vtables.entries.iter().any(|e| e.iid == *iid)
    }

    /// Query for `iid`, acquiring a reference on success.
    pub fn query(&self, iid: &Guid) -> Option<*mut c_void> {
        let found = self.find(iid)?;
        self.add_ref();
        Some(found)
    }

    // === Entry points for generated identity trampolines ===

    /// `queryInterface` behind a foreign `this`.
    ///
    /// # Safety
    ///
    /// `this` as for [`from_this`](Self::from_this); `iid` must point to 16
    /// readable bytes and `out` to a writable pointer.
    pub unsafe fn query_interface_raw(
        this: *mut c_void,
        iid: *const c_void,
        out: *mut *mut c_void,
    ) -> ResultCode {
        if iid.is_null() || out.is_null() {
            return ResultCode::INVALID_ARGUMENT;
        }
        let object = unsafe { Self::from_this(this) };
        let iid = Guid::from_native_bytes(unsafe { *(iid as *const [u8; 16]) });
        match object.query(&iid) {
            Some(found) => {
                unsafe { *out = found };
                ResultCode::OK
            }
            None => {
                trace!(class = type_name::<C>(), %iid, "no interface");
                unsafe { *out = ptr::null_mut() };
                ResultCode::NO_INTERFACE
            }
        }
    }

    /// `addRef` behind a foreign `this`.
    ///
    /// # Safety
    ///
    /// As for [`from_this`](Self::from_this).
    pub unsafe fn add_ref_raw(this: *mut c_void) -> u32 {
        unsafe { Self::from_this(this) }.add_ref()
    }

    /// `release` behind a foreign `this`.
    ///
    /// # Safety
    ///
    /// As for [`release`](Self::release).
    pub unsafe fn release_raw(this: *mut c_void) -> u32 {
        unsafe { Self::release(Self::from_this(this)) }
    }
}

/// An owning Rust-side handle to a [`ComObject`].
///
/// Holds one reference. Cloning acquires another, dropping releases it.
pub struct ComRef<C: Class> {
    ptr: NonNull<ComObject<C>>,
}

// The wrapped value is Send + Sync and the count is atomic.
unsafe impl<C: Class> Send for ComRef<C> {}
unsafe impl<C: Class> Sync for ComRef<C> {}

impl<C: Class> ComRef<C> {
    /// Wrap `value` in a new object with a reference count of one.
    pub fn new(value: C) -> Self {
        Self {
            ptr: ComObject::allocate(value),
        }
    }

    /// The underlying object.
    pub fn object(&self) -> &ComObject<C> {
        unsafe { self.ptr.as_ref() }
    }

    /// Hand out interface `I` as a counted foreign pointer.
    ///
    /// Returns `None` when the class does not implement `I`.
    pub fn as_com_ptr<I: Unknown>(&self) -> Option<ComPtr<I>> {
        let found = self.object().query(&I::IID)?;
        // `query` acquired the reference the ComPtr now owns.
        unsafe { ComPtr::from_raw(found.cast()) }
    }

    /// Hand out interface `I` as a raw pointer carrying one reference.
    pub fn into_raw<I: Interface>(&self) -> Option<*mut I> {
        self.object().query(&I::IID).map(|p| p.cast())
    }
}

impl<C: Class> Deref for ComRef<C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.object().get()
    }
}

impl<C: Class> Clone for ComRef<C> {
    fn clone(&self) -> Self {
        self.object().add_ref();
        Self { ptr: self.ptr }
    }
}

impl<C: Class> Drop for ComRef<C> {
    fn drop(&mut self) {
        unsafe { ComObject::release(self.ptr.as_ptr()) };
    }
}

impl<C: Class + fmt::Debug> fmt::Debug for ComRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComRef")
            .field("value", self.object().get())
            .field("refs", &self.object().ref_count())
            .finish()
    }
}
