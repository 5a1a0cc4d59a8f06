//! Per-instance field access.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use log::trace;
use vc_layout::info::{TypeInfo, Typed};
use vc_ptr::{Ptr, PtrMut};

use crate::error::AccessError;
use crate::field::FieldType;
use crate::shape::StructType;

// -----------------------------------------------------------------------------
// Modules

mod view;

// -----------------------------------------------------------------------------
// Exports

pub use view::{FieldMut, FieldRef};

// -----------------------------------------------------------------------------
// Struct

/// A record instance bound to its [`StructType`].
///
/// Field addresses are resolved on first access and cached for the lifetime
/// of the binding. Writable access ([`value_at`](Self::value_at) and the
/// methods built on it) fills every empty `Option<Box<_>>` on the way with a
/// default value, so a write always lands in the bound instance.
///
/// Holds the exclusive borrow of the instance. It is neither `Send` nor
/// `Sync`.
///
/// # Examples
///
/// ```
/// use vc_access::access;
/// use vc_layout::derive::Record;
///
/// #[derive(Record, Default)]
/// struct Config {
///     name: String,
///     limits: Option<Box<Limits>>,
/// }
///
/// #[derive(Record, Default)]
/// struct Limits {
///     max: u32,
/// }
///
/// let mut config = Config::default();
/// let mut s = access(&mut config).unwrap();
///
/// // `limits.max` is behind an empty pointer: nothing to read yet.
/// assert!(s.field_ref(2).is_none());
///
/// *s.value_at(2).unwrap().into_mut::<u32>().unwrap() = 64;
/// assert_eq!(s.field_ref(2).unwrap().downcast_ref::<u32>(), Some(&64));
/// drop(s);
///
/// assert_eq!(config.limits.unwrap().max, 64);
/// ```
pub struct Struct<'a> {
    shape: Arc<StructType>,
    root: NonNull<u8>,
    values: Box<[Option<NonNull<u8>>]>,
    _marker: PhantomData<&'a mut ()>,
}

impl StructType {
    /// Binds `value` to this shape.
    ///
    /// Fails with [`AccessError::TypeMismatch`] if `T` is not the type the
    /// shape was built for.
    pub fn bind<'a, T: Typed>(self: &Arc<Self>, value: &'a mut T) -> Result<Struct<'a>, AccessError> {
        if TypeId::of::<T>() != self.type_id() {
            return Err(AccessError::TypeMismatch {
                expected: self.type_name(),
                found: type_name::<T>(),
            });
        }
        Ok(Struct::new(Arc::clone(self), PtrMut::from_mut(value)))
    }

    /// Panicking version of [`bind`](Self::bind).
    #[inline]
    pub fn must_bind<'a, T: Typed>(self: &Arc<Self>, value: &'a mut T) -> Struct<'a> {
        self.bind(value).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<'a> Struct<'a> {
    #[inline]
    fn new(shape: Arc<StructType>, root: PtrMut<'a>) -> Self {
        let values = vec![None; shape.num_field()].into_boxed_slice();
        Self {
            shape,
            root: root.as_non_null(),
            values,
            _marker: PhantomData,
        }
    }

    /// Returns the number of fields.
    #[inline]
    pub fn num_field(&self) -> usize {
        self.values.len()
    }

    /// Returns the bound shape.
    #[inline]
    pub fn shape(&self) -> &Arc<StructType> {
        &self.shape
    }

    /// Returns the field descriptor with the given id.
    #[inline]
    pub fn field_type(&self, id: usize) -> Option<&FieldType> {
        self.shape.field_type(id)
    }

    /// Returns `true` if the address of `id` has been cached.
    #[inline]
    pub fn is_resolved(&self, id: usize) -> bool {
        matches!(self.values.get(id), Some(Some(_)))
    }

    /// Returns a writable view of the field `id`, `None` for an unknown id.
    ///
    /// Resolves and caches the field and its ancestors on first access,
    /// allocating default targets for empty pointers on the way.
    pub fn value_at(&mut self, id: usize) -> Option<FieldMut<'_>> {
        let ptr = self.materialize(id)?;
        let field = &self.shape.fields()[id];
        // SAFETY: `ptr` is the element address of `field`, inside the
        // instance exclusively borrowed through `&mut self`.
        Some(unsafe { FieldMut::new(field, PtrMut::new(ptr)) })
    }

    /// Returns the descriptor and a writable view of the field `id`.
    #[inline]
    pub fn field(&mut self, id: usize) -> Option<(&FieldType, FieldMut<'_>)> {
        let view = self.value_at(id)?;
        Some((view.field_type(), view))
    }

    /// Returns a read-only view of the field `id`.
    ///
    /// Never allocates and never fills the cache. `None` for an unknown id,
    /// or when an empty pointer lies on the way.
    pub fn field_ref(&self, id: usize) -> Option<FieldRef<'_>> {
        let field = self.shape.field_type(id)?;
        let ptr = match self.values[id] {
            Some(ptr) => ptr,
            None => self.resolve_ref(id)?,
        };
        // SAFETY: `ptr` is the element address of `field`, readable through
        // `&self`.
        Some(unsafe { FieldRef::new(field, Ptr::new(ptr)) })
    }

    /// Visits every field in id order with a writable view.
    ///
    /// Stops as soon as `f` returns `false`, and returns `false` in that
    /// case.
    pub fn range(&mut self, mut f: impl FnMut(&FieldType, FieldMut<'_>) -> bool) -> bool {
        let shape = Arc::clone(&self.shape);
        for field in shape.fields() {
            let Some(view) = self.value_at(field.id()) else {
                continue;
            };
            if !f(field, view) {
                return false;
            }
        }
        true
    }

    /// Resolves every field of the group `label` and returns read-only
    /// views, in id order.
    ///
    /// Empty for an unknown label.
    pub fn group_values(&mut self, label: &str) -> Vec<FieldRef<'_>> {
        let shape = Arc::clone(&self.shape);
        let ids = shape.group_ids(label);
        for &id in ids {
            self.materialize(id);
        }
        let this: &Self = self;
        ids.iter().filter_map(move |&id| this.field_ref(id)).collect()
    }

    /// Visits the fields of the group `label` with writable views, with the
    /// same early exit as [`range`](Self::range).
    pub fn group_range(&mut self, label: &str, mut f: impl FnMut(FieldMut<'_>) -> bool) -> bool {
        let shape = Arc::clone(&self.shape);
        for &id in shape.group_ids(label) {
            let Some(view) = self.value_at(id) else {
                continue;
            };
            if !f(view) {
                return false;
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Resolution

    /// Returns the cached element address of `id`, resolving it first if
    /// needed.
    fn materialize(&mut self, id: usize) -> Option<NonNull<u8>> {
        if id >= self.values.len() {
            return None;
        }

        loop {
            if let Some(ptr) = self.values[id] {
                return Some(ptr);
            }

            // Outermost unresolved field on the chain, with the address of
            // the record holding it.
            let mut target = id;
            let base = loop {
                match self.shape.fields()[target].parent {
                    None => break self.root,
                    Some(parent) => match self.values[parent] {
                        Some(ptr) => break ptr,
                        None => target = parent,
                    },
                }
            };

            self.values[target] = Some(self.resolve_mut(target, base));
        }
    }

    /// Follows the field `id` from `base`, the address of its record.
    fn resolve_mut(&self, id: usize, base: NonNull<u8>) -> NonNull<u8> {
        let field = &self.shape.fields()[id];

        // SAFETY: `base` is a resolved record inside the instance and
        // `offset` lies within it.
        let mut ptr = unsafe { PtrMut::new(base).member(field.offset()) };
        let mut info = field.declared();

        while let TypeInfo::Pointer(pointer) = info {
            // SAFETY: `ptr` points to the pointer `pointer` describes.
            let (target, allocated) = unsafe { pointer.deref_or_alloc(ptr) };
            if allocated {
                trace!(
                    "allocated `{}` for `{}` of `{}`",
                    pointer.pointee().type_name(),
                    field.selector(),
                    self.shape.type_name(),
                );
            }
            ptr = target;
            info = pointer.pointee();
        }

        #[cfg(all(debug_assertions, feature = "debug"))]
        assert_eq!(info.type_id(), field.elem().type_id());

        ptr.as_non_null()
    }

    /// Follows the chain of `id` down from the closest cached ancestor, or
    /// the root, without allocating. `None` at the first empty pointer.
    fn resolve_ref(&self, id: usize) -> Option<NonNull<u8>> {
        let fields = self.shape.fields();

        let mut chain = Vec::new();
        let mut base = self.root;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if let Some(ptr) = self.values[current] {
                base = ptr;
                break;
            }
            chain.push(current);
            cursor = fields[current].parent;
        }

        for &current in chain.iter().rev() {
            let field = &fields[current];
            // SAFETY: `base` is a resolved record inside the instance and
            // `offset` lies within it.
            let mut ptr = unsafe { Ptr::new(base).member(field.offset()) };
            let mut info = field.declared();
            while let TypeInfo::Pointer(pointer) = info {
                // SAFETY: `ptr` points to the pointer `pointer` describes.
                ptr = unsafe { pointer.deref(ptr) }?;
                info = pointer.pointee();
            }
            base = ptr.as_non_null();
        }

        Some(base)
    }
}

impl fmt::Debug for Struct<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Struct")
            .field("ty", self.shape.ty())
            .field("root", &self.root)
            .field("resolved", &self.values.iter().filter(|v| v.is_some()).count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;

    use vc_layout::derive::Record;
    use vc_layout::info::Kind;

    use crate::policy::IterPolicy;
    use crate::{Accessor, Options, access, analyze};

    #[derive(Record, Default, Debug, PartialEq)]
    struct P1 {
        a: i32,
        b: i32,
        p2: P2,
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct P2 {
        c: i32,
        d: i32,
        p3: Option<Box<P3>>,
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct P3 {
        e: i32,
        f: Option<Box<i32>>,
        g: Option<Box<Option<Box<i32>>>>,
    }

    #[test]
    fn write_every_field_in_id_order() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();
        assert_eq!(s.num_field(), 9);

        let mut written = 0;
        let finished = s.range(|field, mut view| {
            assert_eq!(field.id(), written);
            if let Some(v) = view.downcast_mut::<i32>() {
                *v = field.id() as i32;
            } else {
                assert_eq!(view.kind(), Kind::Record);
            }
            written += 1;
            true
        });
        assert!(finished);
        assert_eq!(written, 9);
        drop(s);

        assert_eq!(p1.a, 0);
        assert_eq!(p1.b, 1);
        assert_eq!(p1.p2.c, 3);
        assert_eq!(p1.p2.d, 4);

        let p3 = p1.p2.p3.as_deref().unwrap();
        assert_eq!(p3.e, 6);
        assert_eq!(p3.f.as_deref(), Some(&7));
        assert_eq!(p3.g.as_deref().and_then(|g| g.as_deref()), Some(&8));
    }

    #[test]
    fn range_stops_early() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();

        let mut seen = Vec::new();
        let finished = s.range(|field, _| {
            seen.push(field.id());
            field.id() < 2
        });

        assert!(!finished);
        assert_eq!(seen, [0, 1, 2]);
        assert!(!s.is_resolved(3));
    }

    #[test]
    fn cached_addresses_are_stable() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();

        let first = s.value_at(1).unwrap().as_ptr();
        let second = s.value_at(1).unwrap().as_ptr();
        assert_eq!(first, second);

        let deep = s.value_at(7).unwrap().as_ptr();
        assert!(s.is_resolved(2));
        assert!(s.is_resolved(5));
        assert!(!s.is_resolved(6));
        assert_eq!(s.value_at(7).unwrap().as_ptr(), deep);
        assert_eq!(s.field_ref(7).unwrap().as_ptr(), deep.cast_const());

        drop(s);
        let f = p1.p2.p3.as_deref().unwrap().f.as_deref().unwrap();
        assert_eq!(core::ptr::from_ref(f).cast::<u8>(), deep.cast_const());
    }

    #[test]
    fn field_ref_never_allocates() {
        let mut p1 = P1::default();
        let s = access(&mut p1).unwrap();

        assert_eq!(s.field_ref(3).unwrap().downcast_ref::<i32>(), Some(&0));
        assert!(s.field_ref(5).is_none());
        assert!(s.field_ref(8).is_none());
        assert!(!s.is_resolved(3));
        drop(s);

        assert!(p1.p2.p3.is_none());
    }

    #[test]
    fn field_ref_follows_existing_pointers() {
        let mut p1 = P1 {
            p2: P2 {
                p3: Some(Box::new(P3 {
                    e: 5,
                    f: None,
                    g: Some(Box::new(Some(Box::new(9)))),
                })),
                ..P2::default()
            },
            ..P1::default()
        };
        let s = access(&mut p1).unwrap();

        assert_eq!(s.field_ref(6).unwrap().downcast_ref::<i32>(), Some(&5));
        assert!(s.field_ref(7).is_none());
        assert_eq!(s.field_ref(8).unwrap().downcast_ref::<i32>(), Some(&9));
        assert_eq!(s.field_ref(5).unwrap().downcast_ref::<P3>().map(|p| p.e), Some(5));
    }

    #[test]
    fn write_survives_materialization() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();

        *s.value_at(8).unwrap().into_mut::<i32>().unwrap() = 42;
        drop(s);

        assert_eq!(
            p1.p2.p3.and_then(|p3| p3.g).and_then(|g| *g).map(|g| *g),
            Some(42),
        );
    }

    #[test]
    fn existing_targets_are_kept() {
        let mut p1 = P1::default();
        p1.p2.p3 = Some(Box::new(P3 {
            e: 11,
            ..P3::default()
        }));
        let before = core::ptr::from_ref(p1.p2.p3.as_deref().unwrap());

        let mut s = access(&mut p1).unwrap();
        assert_eq!(s.value_at(6).unwrap().downcast_ref::<i32>(), Some(&11));
        drop(s);

        assert_eq!(core::ptr::from_ref(p1.p2.p3.as_deref().unwrap()), before);
    }

    #[test]
    fn records_are_read_only_views() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();

        let mut view = s.value_at(2).unwrap();
        assert!(view.is::<P2>());
        assert!(view.downcast_ref::<P2>().is_some());
        assert!(view.downcast_mut::<P2>().is_none());
        assert!(view.into_mut::<P2>().is_none());

        let mut view = s.value_at(0).unwrap();
        assert!(view.downcast_mut::<u32>().is_none());
        assert!(view.downcast_mut::<i32>().is_some());
    }

    #[test]
    fn unexpanded_records_are_writable() {
        #[derive(Record, Default)]
        struct Inner {
            x: u16,
        }

        #[derive(Record, Default)]
        struct Outer {
            inner: Option<Box<Inner>>,
            plain: Inner,
        }

        let accessor =
            Accessor::with_options(Options::new().with_iterator(|_| IterPolicy::SkipOffspring));
        let mut outer = Outer::default();
        let mut s = accessor.access(&mut outer).unwrap();
        assert_eq!(s.num_field(), 2);

        s.value_at(0).unwrap().into_mut::<Inner>().unwrap().x = 3;
        *s.value_at(1).unwrap().into_mut::<Inner>().unwrap() = Inner { x: 4 };
        drop(s);

        assert_eq!(outer.inner.map(|inner| inner.x), Some(3));
        assert_eq!(outer.plain.x, 4);

        // Same for a record cut off by the depth ceiling.
        let shallow = Accessor::with_options(Options::new().with_max_depth(1));
        let mut p1 = P1::default();
        let mut s = shallow.access(&mut p1).unwrap();
        assert_eq!(s.num_field(), 3);

        let p2 = s.value_at(2).unwrap().into_mut::<P2>().unwrap();
        p2.c = 7;
        p2.p3 = Some(Box::default());
        drop(s);

        assert_eq!(p1.p2.c, 7);
        assert!(p1.p2.p3.is_some());
    }

    #[test]
    fn boxed_members_are_followed() {
        #[derive(Record, Default)]
        struct Leaf {
            n: u32,
        }

        #[derive(Record)]
        struct Tree {
            leaf: Box<Leaf>,
            nested: Box<Box<u8>>,
        }

        let mut tree = Tree {
            leaf: Box::new(Leaf { n: 1 }),
            nested: Box::new(Box::new(2)),
        };
        let before = core::ptr::from_ref(&*tree.leaf);

        let mut s = access(&mut tree).unwrap();
        assert_eq!(s.num_field(), 3);
        assert_eq!(s.field_type(1).unwrap().ptr_num(), 2);
        assert_eq!(s.field_type(2).unwrap().selector(), "leaf.n");

        *s.value_at(2).unwrap().into_mut::<u32>().unwrap() = 10;
        *s.value_at(1).unwrap().into_mut::<u8>().unwrap() = 20;
        assert!(s.value_at(0).unwrap().into_mut::<Leaf>().is_none());
        drop(s);

        let s = access(&mut tree).unwrap();
        assert_eq!(s.field_ref(2).unwrap().downcast_ref::<u32>(), Some(&10));
        assert_eq!(s.field_ref(1).unwrap().downcast_ref::<u8>(), Some(&20));
        assert!(!s.is_resolved(2));
        drop(s);

        assert_eq!(tree.leaf.n, 10);
        assert_eq!(**tree.nested, 20);
        assert_eq!(core::ptr::from_ref(&*tree.leaf), before);
    }

    #[test]
    fn invalid_ids_are_empty() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();

        assert!(s.value_at(9).is_none());
        assert!(s.field(usize::MAX).is_none());
        assert!(s.field_ref(9).is_none());
        assert!(s.field_type(9).is_none());
        assert!(!s.is_resolved(9));
    }

    #[test]
    fn field_pairs_descriptor_and_view() {
        let mut p1 = P1::default();
        let mut s = access(&mut p1).unwrap();

        let (field, mut view) = s.field(4).unwrap();
        assert_eq!(field.selector(), "p2.d");
        *view.downcast_mut::<i32>().unwrap() = -1;
        drop(s);

        assert_eq!(p1.p2.d, -1);
    }

    #[test]
    fn bound_through_shape() {
        let shape = analyze::<P1>().unwrap();
        let mut a = P1::default();
        let mut b = P1::default();

        *shape.must_bind(&mut a).value_at(0).unwrap().into_mut::<i32>().unwrap() = 1;
        *shape.must_bind(&mut b).value_at(0).unwrap().into_mut::<i32>().unwrap() = 2;

        assert_eq!((a.a, b.a), (1, 2));
    }

    #[test]
    fn group_values_resolve_members() {
        #[derive(Record, Default)]
        struct Form {
            #[record(tag = "input")]
            user: String,
            #[record(tag = "input")]
            pass: Option<Box<String>>,
            submitted: bool,
        }

        let accessor = Accessor::with_options(
            Options::new()
                .with_group_by(|f| (!f.tag().is_empty()).then(|| String::from(f.tag()))),
        );
        let mut form = Form::default();
        let mut s = accessor.access(&mut form).unwrap();

        let values = s.group_values("input");
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].field_type().selector(), "pass");
        assert_eq!(values[1].downcast_ref::<String>().map(String::as_str), Some(""));
        assert!(s.group_values("missing").is_empty());

        let mut visited = 0;
        let finished = s.group_range("input", |mut view| {
            view.downcast_mut::<String>().unwrap().push('x');
            visited += 1;
            false
        });
        assert!(!finished);
        assert_eq!(visited, 1);
        drop(s);

        assert_eq!(form.user, "x");
        assert_eq!(form.pass.as_deref().map(String::as_str), Some(""));
        assert!(!form.submitted);
    }
}
