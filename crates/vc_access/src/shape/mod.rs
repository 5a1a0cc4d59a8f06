//! Analyzed record shapes.
//!
//! A [`StructType`] is built once per record type and accessor, then shared
//! read-only by every [`Struct`](crate::Struct) bound to that type.

use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use vc_layout::info::Type;
use vc_utils::hash::HashMap;

use crate::field::FieldType;

// -----------------------------------------------------------------------------
// Modules

mod analyze;
mod dump;
mod group;

// -----------------------------------------------------------------------------
// StructType

/// The analyzed field tree of one record type.
///
/// Fields are stored in a flat list indexed by id. Ids are dense and
/// assigned record by record: the members of a record first, then the
/// expansions of its record members in declaration order.
///
/// Immutable once built, so it is shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use vc_access::analyze;
/// use vc_layout::derive::Record;
///
/// #[derive(Record, Default)]
/// struct Size {
///     w: u32,
///     h: u32,
/// }
///
/// #[derive(Record, Default)]
/// struct Window {
///     title: String,
///     size: Size,
/// }
///
/// let shape = analyze::<Window>().unwrap();
///
/// assert_eq!(shape.num_field(), 4);
/// assert_eq!(shape.depth(), 2);
/// assert_eq!(shape.filter(|f| f.selector().starts_with("size.")), [2, 3]);
/// assert_eq!(
///     shape.dump(),
///     "id=0 selector=title\n\
///      id=1 selector=size\n\
///      ····id=2 selector=size.w\n\
///      ····id=3 selector=size.h\n",
/// );
/// ```
pub struct StructType {
    ty: Type,
    fields: Vec<FieldType>,
    tree: Vec<usize>,
    depth: usize,
    groups: HashMap<String, Vec<usize>>,
}

impl StructType {
    /// Returns the [`TypeId`] of the record.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    /// Returns the type name of the record.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    /// Returns the [`Type`] of the record.
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the deepest nesting level that holds a field, `0` when the
    /// shape is empty.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of fields.
    #[inline]
    pub fn num_field(&self) -> usize {
        self.fields.len()
    }

    /// Returns the field with the given id.
    #[inline]
    pub fn field_type(&self, id: usize) -> Option<&FieldType> {
        self.fields.get(id)
    }

    /// Returns every field, in id order.
    #[inline]
    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    /// Returns the ids of the fields matching `pred`, in id order.
    pub fn filter(&self, mut pred: impl FnMut(&FieldType) -> bool) -> Vec<usize> {
        self.fields
            .iter()
            .filter(|field| pred(field))
            .map(FieldType::id)
            .collect()
    }

    /// Iterates over the top-level fields, in declaration order.
    pub fn field_tree(&self) -> impl ExactSizeIterator<Item = &FieldType> {
        self.tree.iter().map(|&id| &self.fields[id])
    }

    /// Returns the enclosing field of `id`.
    ///
    /// `None` for top-level fields and unknown ids.
    pub fn parent(&self, id: usize) -> Option<&FieldType> {
        let parent = self.fields.get(id)?.parent?;
        self.fields.get(parent)
    }

    /// Iterates over the direct sub-fields of `id`.
    ///
    /// Empty for fields without sub-fields and unknown ids.
    pub fn children(&self, id: usize) -> impl Iterator<Item = &FieldType> {
        self.fields
            .get(id)
            .map(FieldType::children)
            .unwrap_or_default()
            .iter()
            .map(|&child| &self.fields[child])
    }

    /// Returns the fields classified under `label`, in id order.
    ///
    /// Empty for unknown labels, or when no classifier was configured.
    pub fn group_types(&self, label: &str) -> Vec<&FieldType> {
        self.group_ids(label)
            .iter()
            .map(|&id| &self.fields[id])
            .collect()
    }

    /// Iterates over every group label with the ids it holds.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.groups
            .iter()
            .map(|(label, ids)| (label.as_str(), ids.as_slice()))
    }

    #[inline]
    pub(crate) fn group_ids(&self, label: &str) -> &[usize] {
        self.groups.get(label).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("ty", &self.ty)
            .field("depth", &self.depth)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
