use core::any::TypeId;
use core::{error, fmt};

use crate::info::{OpaqueInfo, PointerInfo, RecordInfo, Type};

// -----------------------------------------------------------------------------
// Kind

/// The kind of a [`TypeInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Record,
    Pointer,
    Opaque,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.pad("Record"),
            Self::Pointer => f.pad("Pointer"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a `TypeInfo` is not the expected [`Kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindError {
    pub expected: Kind,
    pub received: Kind,
}

impl fmt::Display for KindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "layout kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for KindError {}

// -----------------------------------------------------------------------------
// TypeInfo

/// Layout information of one type.
///
/// Obtained through [`Typed::type_info`](crate::info::Typed::type_info); the
/// returned reference is `'static` and shared by every caller.
///
/// # Examples
///
/// ```
/// use vc_layout::info::{Kind, Typed};
///
/// let info = <Option<Box<Option<Box<i32>>>>>::type_info();
/// assert_eq!(info.kind(), Kind::Pointer);
///
/// let (elem, depth) = info.strip_pointers();
/// assert_eq!(depth, 2);
/// assert!(elem.ty().is::<i32>());
/// ```
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Record(RecordInfo),
    Pointer(PointerInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[doc = concat!("Returns the inner [`", stringify!($info), "`].")]
        #[inline]
        pub const fn $name(&self) -> Result<&$info, KindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(KindError {
                    expected: Kind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

macro_rules! impl_is_method {
    ($name:ident : $kind:ident) => {
        #[doc = concat!("Check if this is a `", stringify!($kind), "`.")]
        #[inline]
        pub const fn $name(&self) -> bool {
            matches!(self, Self::$kind(..))
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_record: Record => RecordInfo);
    impl_cast_method!(as_pointer: Pointer => PointerInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);

    impl_is_method!(is_record: Record);
    impl_is_method!(is_pointer: Pointer);
    impl_is_method!(is_opaque: Opaque);

    /// Returns the [`Kind`].
    #[inline]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Record(_) => Kind::Record,
            Self::Pointer(_) => Kind::Pointer,
            Self::Opaque(_) => Kind::Opaque,
        }
    }

    /// Returns the [`Type`] this information describes.
    #[inline]
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Record(info) => info.ty(),
            Self::Pointer(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    /// Returns the name of the described type.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Follows pointer indirections down to the first non-pointer type.
    ///
    /// Returns that element type and the number of indirections removed.
    pub fn strip_pointers(&'static self) -> (&'static TypeInfo, usize) {
        let mut info = self;
        let mut depth = 0;
        while let Self::Pointer(ptr) = info {
            info = ptr.pointee();
            depth += 1;
        }
        (info, depth)
    }
}
