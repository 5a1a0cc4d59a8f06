use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use crate::field::FieldType;
use crate::policy::IterPolicy;

/// Default nesting ceiling of [`Options::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Classifies a field into a named group, `None` for no group.
pub type GroupByFn = Arc<dyn Fn(&FieldType) -> Option<String> + Send + Sync>;

/// Decides the [`IterPolicy`] of a discovered field.
pub type IteratorFn = Arc<dyn Fn(&FieldType) -> IterPolicy + Send + Sync>;

// -----------------------------------------------------------------------------
// Options

/// Analysis settings of an [`Accessor`](crate::Accessor).
///
/// Fixed at construction: every shape cached by an accessor is built with
/// the same options.
///
/// # Examples
///
/// ```
/// use vc_access::{Accessor, Options, policy::IterPolicy};
///
/// let accessor = Accessor::with_options(
///     Options::new()
///         .with_max_depth(4)
///         .with_iterator(|field| match field.name().starts_with('_') {
///             true => IterPolicy::Skip,
///             false => IterPolicy::Take,
///         })
///         .with_group_by(|field| (!field.tag().is_empty()).then(|| "tagged".into())),
/// );
///
/// assert_eq!(accessor.options().max_depth(), 4);
/// ```
#[derive(Clone)]
pub struct Options {
    max_depth: usize,
    group_by: Option<GroupByFn>,
    iterator: Option<IteratorFn>,
}

impl Options {
    /// Default options: depth 16, no grouping, every field taken.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            group_by: None,
            iterator: None,
        }
    }

    /// Sets the deepest nesting level analyzed.
    ///
    /// Fields at this depth are still included, but their records are not
    /// expanded. `0` yields shapes without fields.
    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds a group index on every analyzed shape.
    pub fn with_group_by<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldType) -> Option<String> + Send + Sync + 'static,
    {
        self.group_by = Some(Arc::new(f));
        self
    }

    /// Consults `f` once per discovered field during analysis.
    pub fn with_iterator<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldType) -> IterPolicy + Send + Sync + 'static,
    {
        self.iterator = Some(Arc::new(f));
        self
    }

    #[inline]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn group_by(&self) -> Option<&GroupByFn> {
        self.group_by.as_ref()
    }

    #[inline]
    pub fn iterator(&self) -> Option<&IteratorFn> {
        self.iterator.as_ref()
    }

    /// The policy of `field`, [`IterPolicy::Take`] without an iterator.
    #[inline]
    pub(crate) fn policy_of(&self, field: &FieldType) -> IterPolicy {
        match &self.iterator {
            Some(f) => f(field),
            None => IterPolicy::Take,
        }
    }
}

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("max_depth", &self.max_depth)
            .field("group_by", &self.group_by.is_some())
            .field("iterator", &self.iterator.is_some())
            .finish()
    }
}
