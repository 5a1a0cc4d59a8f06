use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use vc_layout::info::{Kind, MemberInfo, TypeInfo};

// -----------------------------------------------------------------------------
// FieldType

/// Static description of one field of an analyzed record, possibly nested.
///
/// Descriptors live in the flat list of a [`StructType`](crate::StructType)
/// and refer to each other by id, which is also their index in that list.
///
/// # Examples
///
/// ```
/// use vc_access::analyze;
/// use vc_layout::{derive::Record, info::Kind};
///
/// #[derive(Record, Default)]
/// struct Inner {
///     value: u8,
/// }
///
/// #[derive(Record, Default)]
/// struct Outer {
///     inner: Option<Box<Inner>>,
/// }
///
/// let shape = analyze::<Outer>().unwrap();
/// let value = shape.field_type(1).unwrap();
///
/// assert_eq!(value.selector(), "inner.value");
/// assert_eq!(value.depth(), 2);
/// assert_eq!(value.parent_id(), Some(0));
///
/// let inner = shape.field_type(0).unwrap();
/// assert_eq!(inner.ptr_num(), 1);
/// assert_eq!(inner.kind(), Kind::Pointer);
/// assert_eq!(inner.underlying_kind(), Kind::Record);
/// ```
#[derive(Clone)]
pub struct FieldType {
    pub(crate) id: usize,
    name: &'static str,
    selector: String,
    depth: usize,
    ptr_num: usize,
    offset: usize,
    tag: &'static str,
    declared: &'static TypeInfo,
    elem: &'static TypeInfo,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl FieldType {
    /// Describes `member` as a child of `parent`.
    ///
    /// The id is provisional until the field is accepted into a shape.
    pub(crate) fn new(
        id: usize,
        member: &MemberInfo,
        parent: Option<&FieldType>,
        depth: usize,
    ) -> Self {
        let declared = member.type_info();
        let (elem, ptr_num) = declared.strip_pointers();

        let selector = match parent {
            Some(parent) => {
                let mut s = String::with_capacity(parent.selector.len() + 1 + member.name().len());
                s.push_str(&parent.selector);
                s.push('.');
                s.push_str(member.name());
                s
            }
            None => String::from(member.name()),
        };

        Self {
            id,
            name: member.name(),
            selector,
            depth,
            ptr_num,
            offset: member.offset(),
            tag: member.tag(),
            declared,
            elem,
            parent: parent.map(|p| p.id),
            children: Vec::new(),
        }
    }

    /// Returns the id, the field's index in its shape.
    #[inline]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Returns the declared member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the dot-joined member names from the root record, such as
    /// `"p2.p3.e"`.
    #[inline]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the nesting depth, `1` for members of the root record.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of pointer indirections before the element.
    #[inline]
    pub const fn ptr_num(&self) -> usize {
        self.ptr_num
    }

    /// Returns the byte offset inside the immediate parent record.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the raw tag string attached to the member.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Returns the declared type.
    #[inline]
    pub const fn declared(&self) -> &'static TypeInfo {
        self.declared
    }

    /// Returns the element type, with every pointer stripped.
    #[inline]
    pub const fn elem(&self) -> &'static TypeInfo {
        self.elem
    }

    /// Returns the [`Kind`] of the declared type.
    #[inline]
    pub const fn kind(&self) -> Kind {
        self.declared.kind()
    }

    /// Returns the [`Kind`] of the element type.
    #[inline]
    pub const fn underlying_kind(&self) -> Kind {
        self.elem.kind()
    }

    /// Returns the id of the enclosing field, `None` at the top level.
    #[inline]
    pub const fn parent_id(&self) -> Option<usize> {
        self.parent
    }

    /// Returns the ids of the direct sub-fields, in declaration order.
    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldType")
            .field("id", &self.id)
            .field("selector", &self.selector)
            .field("depth", &self.depth)
            .field("ptr_num", &self.ptr_num)
            .field("offset", &self.offset)
            .field("elem", self.elem.ty())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish()
    }
}
