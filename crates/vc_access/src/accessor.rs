use alloc::sync::Arc;

use vc_layout::info::{TypeInfo, Typed};

use crate::cache::ShapeCache;
use crate::error::AccessError;
use crate::instance::Struct;
use crate::options::Options;
use crate::shape::StructType;

// -----------------------------------------------------------------------------
// Accessor

/// Builds, caches and binds record shapes.
///
/// An accessor owns its own [`ShapeCache`] and applies its [`Options`] to
/// every shape it builds. The free functions of this crate use a
/// process-wide accessor with default options.
///
/// # Examples
///
/// ```
/// use vc_access::{Accessor, Options};
/// use vc_layout::derive::Record;
///
/// #[derive(Record, Default)]
/// struct Account {
///     #[record(tag = "secret")]
///     token: String,
///     balance: i64,
/// }
///
/// let accessor = Accessor::with_options(
///     Options::new().with_group_by(|f| (f.tag() == "secret").then(|| "secret".into())),
/// );
///
/// let mut account = Account::default();
/// let mut s = accessor.access(&mut account).unwrap();
/// s.group_range("secret", |mut view| {
///     view.downcast_mut::<String>().unwrap().push_str("***");
///     true
/// });
/// drop(s);
///
/// assert_eq!(account.token, "***");
/// assert_eq!(accessor.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Accessor {
    options: Options,
    cache: ShapeCache,
}

impl Accessor {
    /// Creates an accessor with default [`Options`].
    #[inline]
    pub const fn new() -> Self {
        Self::with_options(Options::new())
    }

    /// Creates an accessor with the given options.
    #[inline]
    pub const fn with_options(options: Options) -> Self {
        Self {
            options,
            cache: ShapeCache::new(),
        }
    }

    /// Returns the options applied to every shape.
    #[inline]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the shape of `T`, analyzing it on first use.
    ///
    /// Fails with [`AccessError::IllegalType`] if `T` is not a record.
    #[inline]
    pub fn analyze<T: Typed>(&self) -> Result<Arc<StructType>, AccessError> {
        self.analyze_info(T::type_info())
    }

    /// Panicking version of [`analyze`](Self::analyze).
    #[inline]
    pub fn must_analyze<T: Typed>(&self) -> Arc<StructType> {
        self.analyze::<T>().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the shape described by `info`, analyzing it on first use.
    pub fn analyze_info(&self, info: &'static TypeInfo) -> Result<Arc<StructType>, AccessError> {
        let TypeInfo::Record(record) = info else {
            return Err(AccessError::IllegalType {
                type_name: info.type_name(),
            });
        };
        Ok(self
            .cache
            .resolve(info.type_id(), || StructType::analyze(record, &self.options)))
    }

    /// Binds `value` to the shape of `T`.
    ///
    /// Fails with [`AccessError::IllegalType`] if `T` is not a record.
    pub fn access<'a, T: Typed>(&self, value: &'a mut T) -> Result<Struct<'a>, AccessError> {
        self.analyze::<T>()?.bind(value)
    }

    /// Panicking version of [`access`](Self::access).
    #[inline]
    pub fn must_access<'a, T: Typed>(&self, value: &'a mut T) -> Struct<'a> {
        self.access(value).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Returns the number of cached shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.cache.len()
    }
}

// -----------------------------------------------------------------------------
// Default accessor

static DEFAULT: Accessor = Accessor::new();

/// Returns the process-wide accessor used by the free functions.
#[inline]
pub fn default_accessor() -> &'static Accessor {
    &DEFAULT
}

/// [`Accessor::analyze`] on the default accessor.
#[inline]
pub fn analyze<T: Typed>() -> Result<Arc<StructType>, AccessError> {
    DEFAULT.analyze::<T>()
}

/// [`Accessor::must_analyze`] on the default accessor.
#[inline]
pub fn must_analyze<T: Typed>() -> Arc<StructType> {
    DEFAULT.must_analyze::<T>()
}

/// [`Accessor::access`] on the default accessor.
#[inline]
pub fn access<T: Typed>(value: &mut T) -> Result<Struct<'_>, AccessError> {
    DEFAULT.access(value)
}

/// [`Accessor::must_access`] on the default accessor.
#[inline]
pub fn must_access<T: Typed>(value: &mut T) -> Struct<'_> {
    DEFAULT.must_access(value)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::thread;

    use vc_layout::derive::Record;
    use vc_layout::info::Typed;

    use super::{Accessor, analyze};
    use crate::error::AccessError;
    use crate::options::Options;

    #[derive(Record, Default)]
    struct Inner {
        x: u16,
        y: Option<Box<u16>>,
    }

    #[derive(Record, Default)]
    struct Outer {
        id: u64,
        inner: Inner,
        boxed: Option<Box<Inner>>,
    }

    #[derive(Record, Default)]
    struct Other {
        id: u64,
    }

    #[test]
    fn cached_once() {
        let accessor = Accessor::new();
        let a = accessor.analyze::<Outer>().unwrap();
        let b = accessor.analyze::<Outer>().unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(accessor.len(), 1);

        accessor.analyze::<Inner>().unwrap();
        assert_eq!(accessor.len(), 2);
    }

    #[test]
    fn accessors_do_not_share_shapes() {
        let shallow = Accessor::with_options(Options::new().with_max_depth(1));
        let deep = Accessor::new();

        assert_eq!(shallow.must_analyze::<Outer>().num_field(), 3);
        assert_eq!(deep.must_analyze::<Outer>().num_field(), 7);
        assert!(!Arc::ptr_eq(
            &shallow.must_analyze::<Outer>(),
            &deep.must_analyze::<Outer>(),
        ));
    }

    #[test]
    fn concurrent_resolution_converges() {
        let accessor = Accessor::new();

        let shapes: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| accessor.must_analyze::<Outer>()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = accessor.must_analyze::<Outer>();
        for shape in &shapes {
            assert!(Arc::ptr_eq(shape, &first));
        }
        assert_eq!(accessor.len(), 1);
    }

    #[test]
    fn illegal_types() {
        let accessor = Accessor::new();

        let err = accessor.analyze::<i32>().unwrap_err();
        assert_eq!(err, AccessError::IllegalType { type_name: "i32" });

        let mut boxed: Option<Box<Outer>> = None;
        let err = accessor.access(&mut boxed).map(|_| ()).unwrap_err();
        assert!(matches!(err, AccessError::IllegalType { .. }));

        let err = accessor.analyze_info(<Vec<u8>>::type_info()).unwrap_err();
        assert!(matches!(err, AccessError::IllegalType { .. }));
        assert_eq!(accessor.len(), 0);
    }

    #[test]
    #[should_panic = "illegal type"]
    fn must_analyze_panics() {
        Accessor::new().must_analyze::<u8>();
    }

    #[test]
    fn type_mismatch() {
        let shape = analyze::<Outer>().unwrap();
        let mut other = Other::default();

        let err = shape.bind(&mut other).map(|_| ()).unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));
    }

    #[test]
    fn default_accessor_is_shared() {
        let a = analyze::<Other>().unwrap();
        let b = super::default_accessor().analyze::<Other>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
