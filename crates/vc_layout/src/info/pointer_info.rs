use alloc::boxed::Box;
use core::fmt;

use vc_ptr::{Ptr, PtrMut};

use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// PointerInfo

/// Layout information of a single pointer indirection.
///
/// Besides the pointee type it stores the functions needed to follow the
/// pointer through an erased address:
///
/// - [`deref`](Self::deref) follows it for reading and yields `None` when
///   the pointer is empty.
/// - [`deref_or_alloc`](Self::deref_or_alloc) follows it for writing, first
///   storing a `Default` target into an empty pointer.
///
/// Two shapes are supported out of the box: `Box<T>` (never empty) and
/// `Option<Box<T>>` (empty when `None`).
///
/// # Examples
///
/// ```
/// use vc_layout::info::Typed;
/// use vc_ptr::PtrMut;
///
/// let mut slot: Option<Box<u8>> = None;
/// let info = <Option<Box<u8>>>::type_info().as_pointer().unwrap();
///
/// let (target, allocated) = unsafe { info.deref_or_alloc(PtrMut::from_mut(&mut slot)) };
/// assert!(allocated);
/// unsafe { *target.consume::<u8>() = 5 };
///
/// assert_eq!(slot.as_deref(), Some(&5));
/// ```
#[derive(Clone)]
pub struct PointerInfo {
    ty: Type,
    nullable: bool,
    pointee: fn() -> &'static TypeInfo,
    deref: for<'a> unsafe fn(Ptr<'a>) -> Option<Ptr<'a>>,
    deref_or_alloc: for<'a> unsafe fn(PtrMut<'a>) -> (PtrMut<'a>, bool),
}

impl PointerInfo {
    /// Information for `Box<T>`.
    pub fn boxed<T: Typed>() -> Self {
        Self {
            ty: Type::of::<Box<T>>(),
            nullable: false,
            pointee: T::type_info,
            deref: deref_box::<T>,
            deref_or_alloc: deref_box_mut::<T>,
        }
    }

    /// Information for `Option<Box<T>>`.
    ///
    /// `T: Default` provides the target written into an empty pointer.
    pub fn optional_boxed<T: Typed + Default>() -> Self {
        Self {
            ty: Type::of::<Option<Box<T>>>(),
            nullable: true,
            pointee: T::type_info,
            deref: deref_option_box::<T>,
            deref_or_alloc: deref_option_box_mut::<T>,
        }
    }

    /// Returns the [`Type`] of the pointer itself.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns `true` if the pointer can be empty.
    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the [`TypeInfo`] of the pointee.
    #[inline]
    pub fn pointee(&self) -> &'static TypeInfo {
        (self.pointee)()
    }

    /// Follows the pointer stored at `ptr`, `None` if it is empty.
    ///
    /// # Safety
    /// `ptr` must point to a valid, aligned value of the type this
    /// information describes.
    #[inline]
    pub unsafe fn deref<'a>(&self, ptr: Ptr<'a>) -> Option<Ptr<'a>> {
        // SAFETY: upheld by the caller.
        unsafe { (self.deref)(ptr) }
    }

    /// Follows the pointer stored at `ptr`, allocating a default target
    /// first if it is empty. The flag tells whether an allocation happened.
    ///
    /// # Safety
    /// `ptr` must point to a valid, aligned value of the type this
    /// information describes, and must be writable.
    #[inline]
    pub unsafe fn deref_or_alloc<'a>(&self, ptr: PtrMut<'a>) -> (PtrMut<'a>, bool) {
        // SAFETY: upheld by the caller.
        unsafe { (self.deref_or_alloc)(ptr) }
    }
}

impl fmt::Debug for PointerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerInfo")
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// VTable functions

unsafe fn deref_box<'a, T: 'static>(ptr: Ptr<'a>) -> Option<Ptr<'a>> {
    ptr.debug_assert_aligned::<Box<T>>();
    // SAFETY: `ptr` points to a `Box<T>`.
    let boxed = unsafe { ptr.as_ref::<Box<T>>() };
    Some(Ptr::from_ref(&**boxed))
}

unsafe fn deref_box_mut<'a, T: 'static>(ptr: PtrMut<'a>) -> (PtrMut<'a>, bool) {
    ptr.debug_assert_aligned::<Box<T>>();
    // SAFETY: `ptr` points to a `Box<T>`.
    let boxed = unsafe { ptr.consume::<Box<T>>() };
    (PtrMut::from_mut(&mut **boxed), false)
}

unsafe fn deref_option_box<'a, T: 'static>(ptr: Ptr<'a>) -> Option<Ptr<'a>> {
    ptr.debug_assert_aligned::<Option<Box<T>>>();
    // SAFETY: `ptr` points to an `Option<Box<T>>`.
    let slot = unsafe { ptr.as_ref::<Option<Box<T>>>() };
    slot.as_deref().map(Ptr::from_ref)
}

unsafe fn deref_option_box_mut<'a, T: Default + 'static>(ptr: PtrMut<'a>) -> (PtrMut<'a>, bool) {
    ptr.debug_assert_aligned::<Option<Box<T>>>();
    // SAFETY: `ptr` points to an `Option<Box<T>>`.
    let slot = unsafe { ptr.consume::<Option<Box<T>>>() };
    let allocated = slot.is_none();
    let target = slot.get_or_insert_with(Box::default);
    (PtrMut::from_mut(&mut **target), allocated)
}
