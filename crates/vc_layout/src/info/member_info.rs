use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// MemberInfo

/// A named member of a record.
///
/// # Examples
///
/// ```
/// use vc_layout::{derive::Record, info::Typed};
///
/// #[derive(Record)]
/// struct Foo {
///     flag: bool,
///     #[record(tag = "db:\"amount\"")]
///     amount: f32,
/// }
///
/// let info = Foo::type_info().as_record().unwrap();
/// let member = info.member_at(1).unwrap();
///
/// assert!(member.type_is::<f32>());
/// assert_eq!(member.name(), "amount");
/// assert_eq!(member.offset(), core::mem::offset_of!(Foo, amount));
/// assert_eq!(member.tag(), "db:\"amount\"");
/// ```
#[derive(Clone)]
pub struct MemberInfo {
    name: &'static str,
    offset: usize,
    ty_id: TypeId,
    // Resolved on demand: a record may refer to itself through a pointer.
    type_info: fn() -> &'static TypeInfo,
    tag: &'static str,
}

impl MemberInfo {
    /// Creates a member called `name`, of type `T`, stored `offset` bytes
    /// into its record.
    #[inline]
    pub fn new<T: Typed>(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            ty_id: TypeId::of::<T>(),
            type_info: T::type_info,
            tag: "",
        }
    }

    /// Attaches a tag string. Its content is never interpreted here.
    #[inline]
    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Returns the declared member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the byte offset inside the enclosing record.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the tag string, empty when none was given.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Returns the [`TypeId`] of the declared type.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the declared type is `T`.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Returns the [`TypeInfo`] of the declared type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `type_info` is skipped to stay finite on self-referencing records.
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}
