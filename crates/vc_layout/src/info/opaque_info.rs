use crate::info::{Type, Typed};

/// Layout information for types whose inside is not exposed, such as `u64`,
/// `String` or `Vec<T>`.
#[derive(Debug, Clone)]
pub struct OpaqueInfo {
    ty: Type,
}

impl OpaqueInfo {
    /// Create a new [`OpaqueInfo`] for `T`.
    #[inline]
    pub fn new<T: Typed>() -> Self {
        Self { ty: Type::of::<T>() }
    }

    /// Returns the described [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}
