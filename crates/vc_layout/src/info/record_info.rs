use alloc::boxed::Box;

use crate::info::{MemberInfo, Type, Typed};

/// Layout information of a record: its members in declaration order.
///
/// # Examples
///
/// ```rust
/// use vc_layout::{derive::Record, info::Typed};
///
/// #[derive(Record)]
/// struct A {
///     val: f32,
///     id: u64,
/// }
///
/// let info = A::type_info().as_record().unwrap();
///
/// assert_eq!(info.len(), 2);
/// assert_eq!(info.index_of("id"), Some(1));
/// assert_eq!(info.iter().map(|m| m.name()).collect::<Vec<_>>(), ["val", "id"]);
/// ```
#[derive(Clone, Debug)]
pub struct RecordInfo {
    ty: Type,
    members: Box<[MemberInfo]>,
}

impl RecordInfo {
    /// Create a new [`RecordInfo`] for `T`.
    ///
    /// The member order is kept as given and must be the declaration order.
    ///
    /// # Safety
    /// Every member must describe a field of `T`: a value of the member's
    /// type lives at its offset in every `T`.
    pub unsafe fn new<T: Typed>(members: &[MemberInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            members: members.into(),
        }
    }

    /// Returns the described [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the member called `name`, if present.
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name() == name)
    }

    /// Returns the member at `index`, if present.
    #[inline]
    pub fn member_at(&self, index: usize) -> Option<&MemberInfo> {
        self.members.get(index)
    }

    /// Returns the position of the member called `name`.
    ///
    /// This is O(N) complexity.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name() == name)
    }

    /// Iterates over the members in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MemberInfo> {
        self.members.iter()
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::mem::offset_of;

    use crate::derive::Record;
    use crate::info::{Kind, Typed};

    #[derive(Record, Default)]
    struct Pair<T> {
        left: T,
        right: Option<Box<T>>,
    }

    #[derive(Record)]
    struct Flags {
        r#type: u8,
        #[record(skip)]
        _scratch: core::cell::Cell<u8>,
        #[record(tag = "json:\"label\"")]
        label: String,
    }

    #[test]
    fn generic_records_are_per_instantiation() {
        let a = <Pair<u8>>::type_info().as_record().unwrap();
        let b = <Pair<String>>::type_info().as_record().unwrap();

        assert!(a.ty().is::<Pair<u8>>());
        assert!(b.ty().is::<Pair<String>>());
        assert!(a.member("left").unwrap().type_is::<u8>());
        assert!(b.member("left").unwrap().type_is::<String>());
        assert_eq!(
            b.member("right").unwrap().offset(),
            offset_of!(Pair<String>, right)
        );
        assert_eq!(b.member("right").unwrap().type_info().kind(), Kind::Pointer);
    }

    #[test]
    fn derived_members_lie_inside_their_record() {
        let info = <Pair<String>>::type_info().as_record().unwrap();
        let size = info.ty().size();

        for member in info.iter() {
            let ty = member.type_info().ty();
            assert_eq!(ty.id(), member.ty_id());
            assert_eq!(member.offset() % ty.align(), 0);
            assert!(member.offset() + ty.size() <= size);
        }
    }

    #[test]
    fn raw_names_and_skipped_members() {
        let info = Flags::type_info().as_record().unwrap();
        let names: Vec<_> = info.iter().map(|m| m.name()).collect();

        assert_eq!(names, ["type", "label"]);
        assert_eq!(info.member("type").unwrap().tag(), "");
        assert_eq!(info.member("label").unwrap().tag(), "json:\"label\"");
        assert_eq!(info.index_of("_scratch"), None);
    }
}
