use alloc::boxed::Box;

use crate::cell::GenericTypeInfoCell;
use crate::info::{PointerInfo, TypeInfo, Typed};

// SAFETY: `PointerInfo::boxed` describes `Box<T>`.
unsafe impl<T: Typed> Typed for Box<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::boxed::<T>()))
    }
}

// SAFETY: `PointerInfo::optional_boxed` describes `Option<Box<T>>`.
unsafe impl<T: Typed + Default> Typed for Option<Box<T>> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::optional_boxed::<T>()))
    }
}
