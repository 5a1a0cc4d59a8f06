use alloc::string::String;
use alloc::vec::Vec;

use crate::cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
use crate::info::{OpaqueInfo, TypeInfo, Typed};

macro_rules! impl_opaque {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: opaque info of `Self`.
            unsafe impl Typed for $ty {
                fn type_info() -> &'static TypeInfo {
                    static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
                }
            }
        )*
    };
}

impl_opaque!(
    (), bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
    String, &'static str,
);

// SAFETY: opaque info of `Self`.
unsafe impl<T: Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
    }
}
