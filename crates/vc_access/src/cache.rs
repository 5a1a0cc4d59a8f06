//! Process-wide storage of analyzed shapes.

use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::{PoisonError, RwLock};

use log::debug;
use vc_utils::TypeIdMap;

use crate::shape::StructType;

// -----------------------------------------------------------------------------
// ShapeCache

/// Maps a record's [`TypeId`] to its shared [`StructType`].
///
/// Entries are never evicted or replaced. Lookups share a read lock; a miss
/// builds the shape without holding any lock, then inserts it under the
/// write lock. When two threads race on the same type, the first insertion
/// is kept and both receive it.
pub struct ShapeCache {
    shapes: RwLock<TypeIdMap<Arc<StructType>>>,
}

impl ShapeCache {
    /// Creates an empty cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            shapes: RwLock::new(TypeIdMap::new()),
        }
    }

    /// Returns the cached shape of `type_id`.
    pub fn get(&self, type_id: TypeId) -> Option<Arc<StructType>> {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    /// Returns the cached shape of `type_id`, building it with `build` on a
    /// miss.
    #[inline]
    pub fn resolve(
        &self,
        type_id: TypeId,
        build: impl FnOnce() -> StructType,
    ) -> Arc<StructType> {
        match self.get(type_id) {
            Some(shape) => shape,
            None => self.insert(type_id, build()),
        }
    }

    #[inline(never)]
    fn insert(&self, type_id: TypeId, shape: StructType) -> Arc<StructType> {
        let mut shapes = self.shapes.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = shapes.get(&type_id) {
            debug!("shape of `{}` was cached concurrently, dropping the duplicate", shape.type_name());
            return existing.clone();
        }
        debug!("caching shape of `{}`", shape.type_name());
        shapes.get_or_insert(type_id, || Arc::new(shape)).clone()
    }

    /// Returns the number of cached shapes.
    pub fn len(&self) -> usize {
        self.shapes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ShapeCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ShapeCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShapeCache").field("len", &self.len()).finish()
    }
}
