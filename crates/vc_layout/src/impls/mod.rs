//! [`Typed`] implementations for foreign types.
//!
//! - opaque:
//!     - `()`, `bool`, `char`
//!     - `i8`-`i128`, `isize`, `u8`-`u128`, `usize`, `f32`, `f64`
//!     - `String`, `&'static str`, `Vec<T>`
//! - pointer:
//!     - `Box<T>`
//!     - `Option<Box<T>>` with `T: Default`
//!
//! `Option<T>` for other `T` is deliberately not described: only the boxed
//! form is an indirection.

mod opaque;
mod pointer;

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::info::{Kind, Typed};

    #[test]
    fn primitive_kinds() {
        assert_eq!(i32::type_info().kind(), Kind::Opaque);
        assert_eq!(String::type_info().kind(), Kind::Opaque);
        assert_eq!(<Vec<u8>>::type_info().kind(), Kind::Opaque);
        assert_eq!(<Box<u8>>::type_info().kind(), Kind::Pointer);
        assert_eq!(<Option<Box<u8>>>::type_info().kind(), Kind::Pointer);
    }

    #[test]
    fn generic_cells_are_per_type() {
        let a = <Vec<u8>>::type_info();
        let b = <Vec<u16>>::type_info();

        assert!(a.ty().is::<Vec<u8>>());
        assert!(b.ty().is::<Vec<u16>>());
        assert!(core::ptr::eq(a, <Vec<u8>>::type_info()));
    }

    #[test]
    fn strip_nested_pointers() {
        let (elem, depth) = <Box<Option<Box<f64>>>>::type_info().strip_pointers();
        assert_eq!(depth, 2);
        assert!(elem.ty().is::<f64>());

        let (elem, depth) = u8::type_info().strip_pointers();
        assert_eq!(depth, 0);
        assert!(elem.ty().is::<u8>());
    }
}
