use core::any::{Any, TypeId};
use core::fmt;

use vc_layout::info::{Kind, TypeInfo};
use vc_ptr::{Ptr, PtrMut};

use crate::field::FieldType;

// -----------------------------------------------------------------------------
// FieldRef

/// A read-only view of one resolved field.
///
/// The view always points at the element, behind every pointer the field is
/// declared with.
#[derive(Clone, Copy)]
pub struct FieldRef<'s> {
    field: &'s FieldType,
    ptr: Ptr<'s>,
}

impl<'s> FieldRef<'s> {
    /// # Safety
    /// `ptr` must point to a valid value of `field.elem()`, readable for `'s`.
    #[inline]
    pub(crate) const unsafe fn new(field: &'s FieldType, ptr: Ptr<'s>) -> Self {
        Self { field, ptr }
    }

    /// Returns the descriptor of the viewed field.
    #[inline]
    pub const fn field_type(&self) -> &'s FieldType {
        self.field
    }

    /// Returns the element type.
    #[inline]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.field.elem()
    }

    /// Returns the [`Kind`] of the element.
    #[inline]
    pub const fn kind(&self) -> Kind {
        self.field.underlying_kind()
    }

    /// Check if the element is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.field.elem().type_id() == TypeId::of::<T>()
    }

    /// Returns the element as a `&T`, `None` if it is not a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&'s T> {
        if self.is::<T>() {
            // SAFETY: the element is a valid `T`.
            Some(unsafe { self.ptr.as_ref::<T>() })
        } else {
            None
        }
    }

    /// Returns the element address.
    #[inline]
    pub const fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("selector", &self.field.selector())
            .field("elem", self.field.elem().ty())
            .field("ptr", &self.ptr)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// FieldMut

/// A writable view of one resolved field.
///
/// A record with sub-fields in the shape is only writable member by member:
/// [`downcast_mut`] and [`into_mut`] return `None` for it, so the addresses
/// resolved below it stay valid. Records the shape does not expand are
/// written as a whole.
///
/// [`downcast_mut`]: Self::downcast_mut
/// [`into_mut`]: Self::into_mut
pub struct FieldMut<'s> {
    field: &'s FieldType,
    ptr: PtrMut<'s>,
}

impl<'s> FieldMut<'s> {
    /// # Safety
    /// `ptr` must point to a valid value of `field.elem()`, exclusively
    /// borrowed for `'s`.
    #[inline]
    pub(crate) const unsafe fn new(field: &'s FieldType, ptr: PtrMut<'s>) -> Self {
        Self { field, ptr }
    }

    /// Returns the descriptor of the viewed field.
    #[inline]
    pub const fn field_type(&self) -> &'s FieldType {
        self.field
    }

    /// Returns the element type.
    #[inline]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.field.elem()
    }

    /// Returns the [`Kind`] of the element.
    #[inline]
    pub const fn kind(&self) -> Kind {
        self.field.underlying_kind()
    }

    /// Check if the element is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.field.elem().type_id() == TypeId::of::<T>()
    }

    #[inline]
    fn is_writable<T: Any>(&self) -> bool {
        self.is::<T>() && (self.kind() != Kind::Record || self.field.children().is_empty())
    }

    /// Returns the element as a `&T`, `None` if it is not a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_ref().downcast_ref()
    }

    /// Returns the element as a `&mut T`.
    ///
    /// `None` if it is not a `T`, or if it is a record with sub-fields.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        if self.is_writable::<T>() {
            // SAFETY: the element is a valid `T`, borrowed through `&mut self`.
            Some(unsafe { self.ptr.as_mut::<T>() })
        } else {
            None
        }
    }

    /// Converts into a `&'s mut T`, with the same rules as
    /// [`downcast_mut`](Self::downcast_mut).
    #[inline]
    pub fn into_mut<T: Any>(self) -> Option<&'s mut T> {
        if self.is_writable::<T>() {
            // SAFETY: the element is a valid `T`, borrowed for `'s`.
            Some(unsafe { self.ptr.consume::<T>() })
        } else {
            None
        }
    }

    /// Borrows as a read-only view.
    #[inline]
    pub const fn as_ref(&self) -> FieldRef<'_> {
        FieldRef {
            field: self.field,
            ptr: self.ptr.borrow(),
        }
    }

    /// Returns the element address.
    #[inline]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

impl fmt::Debug for FieldMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMut")
            .field("selector", &self.field.selector())
            .field("elem", self.field.elem().ty())
            .field("ptr", &self.ptr)
            .finish()
    }
}
