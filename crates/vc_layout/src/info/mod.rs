//! Compile-time layout information.
//!
//! - [`Type`]: `TypeId`, name, size and alignment of a single type.
//! - [`TypeInfo`]: one of [`RecordInfo`], [`PointerInfo`] or [`OpaqueInfo`].
//! - [`MemberInfo`]: a named member of a record, with its byte offset.
//! - [`Kind`]: the discriminant of a [`TypeInfo`].
//! - [`Typed`]: the trait that hands out a type's `&'static TypeInfo`.

// -----------------------------------------------------------------------------
// Modules

mod member_info;
mod opaque_info;
mod pointer_info;
mod record_info;
mod ty;
mod type_info;

// -----------------------------------------------------------------------------
// Exports

pub use member_info::MemberInfo;
pub use opaque_info::OpaqueInfo;
pub use pointer_info::PointerInfo;
pub use record_info::RecordInfo;
pub use ty::Type;
pub use type_info::{Kind, KindError, TypeInfo};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to a type's layout information.
///
/// Implemented by [`#[derive(Record)]`](crate::derive::Record) for records,
/// and by this crate for primitives and pointer types.
///
/// # Manually Impl
///
/// Non-generic types store their info in a
/// [`NonGenericTypeInfoCell`](crate::cell::NonGenericTypeInfoCell):
///
/// ```
/// use core::mem::offset_of;
/// use vc_layout::cell::NonGenericTypeInfoCell;
/// use vc_layout::info::{MemberInfo, RecordInfo, TypeInfo, Typed};
///
/// struct Pair {
///     left: i64,
///     right: i64,
/// }
///
/// // SAFETY: the info is built for `Pair`, from its own member offsets.
/// unsafe impl Typed for Pair {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             let members = [
///                 MemberInfo::new::<i64>("left", offset_of!(Pair, left)),
///                 MemberInfo::new::<i64>("right", offset_of!(Pair, right)),
///             ];
///             // SAFETY: both members are `i64` fields of `Pair` at these offsets.
///             TypeInfo::Record(unsafe { RecordInfo::new::<Self>(&members) })
///         })
///     }
/// }
///
/// let info = Pair::type_info().as_record().unwrap();
/// assert_eq!(info.index_of("right"), Some(1));
/// ```
///
/// The implementation must be marked `unsafe`, a safe one is rejected:
///
/// ```compile_fail
/// use vc_layout::cell::NonGenericTypeInfoCell;
/// use vc_layout::info::{OpaqueInfo, TypeInfo, Typed};
///
/// struct Small(u64);
///
/// impl Typed for Small {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<String>()))
///     }
/// }
/// ```
///
/// Generic types must use a
/// [`GenericTypeInfoCell`](crate::cell::GenericTypeInfoCell) instead, because
/// a `static` inside a generic function is shared by every instantiation.
///
/// # Safety
///
/// Field access trusts the returned info to describe `Self`:
/// - its [`Type`] must be the one of `Self`;
/// - a [`RecordInfo`] may only list members that really live in `Self`, at
///   the given offsets and with the given types;
/// - a [`PointerInfo`] must come from the constructor matching `Self`.
///
/// `#[derive(Record)]` upholds all of these.
pub unsafe trait Typed: 'static {
    /// Returns the layout information of `Self`.
    fn type_info() -> &'static TypeInfo;
}
