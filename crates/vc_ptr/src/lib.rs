//! Lifetime-carrying, type-erased pointers used for field addressing.
//!
//! Record descriptors only know members by byte offset, so the accessor
//! layer has to walk raw addresses. The types here keep that walk close to
//! the safety of references:
//!
//! **Ptr** and **PtrMut**
//!
//! [`Ptr<'a>`] and [`PtrMut<'a>`] behave like `&'a dyn Any` and
//! `&'a mut dyn Any` without the vtable. They add a lifetime, byte offset
//! arithmetic ([`Ptr::member`]) and debug-only alignment checks on top of a
//! `NonNull<u8>`.
//!
//! Neither type knows what it points to. The caller supplies the type when
//! reading, and must guarantee it matches the pointee.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use erased::{Ptr, PtrMut};
