use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_common {
    ($ptr:ident) => {
        impl From<$ptr<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(ptr: $ptr<'_>) -> Self {
                ptr.0
            }
        }

        impl $ptr<'_> {
            /// Check if the pointer is aligned to type `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.0.as_ptr().cast::<T>().is_aligned()
            }

            /// Alignment check that disappears in release builds.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "pointer is not aligned. Address {:p} does not have alignment {} for type {}",
                    self.0,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
            }

            /// Returns the raw address without the lifetime.
            #[inline(always)]
            pub const fn as_non_null(&self) -> NonNull<u8> {
                self.0
            }

            /// Moves the pointer `offset` bytes forward, to a member of the
            /// pointee that lives at that byte offset.
            ///
            /// # Safety
            /// - `offset` must be the offset of a member of the pointee, so the
            ///   result stays inside the same allocation.
            /// - The member must live at least as long as `'a`.
            #[inline]
            pub const unsafe fn member(self, offset: usize) -> Self {
                Self(
                    // SAFETY: the caller guarantees the offset is in bounds.
                    unsafe { self.0.add(offset) },
                    PhantomData,
                )
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// A shared, type-erased pointer, similar to `&'a dyn Any`.
///
/// The pointee must stay valid and unchanged for `'a`.
///
/// # Examples
///
/// ```
/// # use vc_ptr::Ptr;
/// #[repr(C)]
/// struct Pair { a: u32, b: u32 }
///
/// let pair = Pair { a: 1, b: 2 };
/// let ptr = Ptr::from_ref(&pair);
///
/// let b = unsafe { ptr.member(core::mem::offset_of!(Pair, b)).as_ref::<u32>() };
/// assert_eq!(*b, 2);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_common!(Ptr);

impl<'a> Ptr<'a> {
    /// Create a `Ptr` from a raw address.
    ///
    /// # Safety
    /// - `ptr` must point to a valid object for the whole of `'a`.
    /// - The object must not be mutated while the `Ptr` (or copies) live.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Ptr<'a> {
        Ptr(ptr, PhantomData)
    }

    /// Creates a `Ptr` from a reference with the same lifetime.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Ptr<'a> {
        Ptr(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Reads the pointee as `&'a T`.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee.
    /// - The pointer must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: upheld by the caller.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// An exclusive, type-erased pointer, similar to `&'a mut dyn Any`.
///
/// It cannot be copied; [`borrow`](PtrMut::borrow) hands out a shared,
/// shorter-lived [`Ptr`] while keeping the original.
///
/// # Examples
///
/// ```
/// # use vc_ptr::PtrMut;
/// #[repr(C)]
/// struct Pair { a: u32, b: u32 }
///
/// let mut pair = Pair { a: 1, b: 2 };
/// let ptr = PtrMut::from_mut(&mut pair);
///
/// let b = unsafe { ptr.member(core::mem::offset_of!(Pair, b)).consume::<u32>() };
/// *b = 20;
/// assert_eq!(pair.b, 20);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_common!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Create a `PtrMut` from a raw address.
    ///
    /// # Safety
    /// - `ptr` must point to a valid object, writable for the whole of `'a`.
    /// - No other pointer may access the object while this one is used.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> PtrMut<'a> {
        PtrMut(ptr, PhantomData)
    }

    /// Creates a `PtrMut` from a mutable reference with the same lifetime.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> PtrMut<'a> {
        PtrMut(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Reads the pointee as `&T`, borrowing `self`.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee.
    /// - The pointer must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(&self) -> &'_ T {
        // SAFETY: upheld by the caller.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }

    /// Reads the pointee as `&mut T`, borrowing `self` mutably.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee.
    /// - The pointer must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_mut<T>(&mut self) -> &'_ mut T {
        // SAFETY: upheld by the caller.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// Converts into `&'a mut T`, consuming the pointer.
    ///
    /// # Safety
    /// - `T` must be the actual type of the pointee.
    /// - The pointer must be aligned for `T`.
    #[inline(always)]
    pub const unsafe fn consume<T>(self) -> &'a mut T {
        // SAFETY: upheld by the caller.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }

    /// A shared pointer with a lifetime bounded by `&self`.
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::mem::offset_of;

    use super::{Ptr, PtrMut};

    #[repr(C)]
    struct Outer {
        tag: u8,
        inner: Inner,
    }

    #[repr(C)]
    struct Inner {
        x: u16,
        y: u64,
    }

    #[test]
    fn nested_member_offsets() {
        let outer = Outer {
            tag: 3,
            inner: Inner { x: 4, y: 5 },
        };
        let root = Ptr::from_ref(&outer);

        let inner = unsafe { root.member(offset_of!(Outer, inner)) };
        let y = unsafe { inner.member(offset_of!(Inner, y)) };

        y.debug_assert_aligned::<u64>();
        assert_eq!(unsafe { *y.as_ref::<u64>() }, 5);
        assert_eq!(unsafe { *root.as_ref::<u8>() }, 3);
    }

    #[test]
    fn write_through_member() {
        let mut outer = Outer {
            tag: 0,
            inner: Inner { x: 1, y: 2 },
        };
        let mut root = PtrMut::from_mut(&mut outer);

        unsafe { root.as_mut::<Outer>().tag = 9 };
        assert_eq!(unsafe { root.as_ref::<Outer>().tag }, 9);

        let x = unsafe { root.member(offset_of!(Outer, inner) + offset_of!(Inner, x)) };
        unsafe { *x.consume::<u16>() = 40 };

        assert_eq!(outer.inner.x, 40);
        assert_eq!(outer.tag, 9);
    }

    #[test]
    fn address_round_trip() {
        let mut v = 7u32;
        let ptr = PtrMut::from_mut(&mut v);
        let addr = ptr.as_non_null();

        let again = unsafe { PtrMut::new(addr) };
        assert_eq!(again.as_ptr(), addr.as_ptr());
        assert!(again.is_aligned::<u32>());
    }
}
