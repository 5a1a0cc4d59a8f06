//! Cached field access for nested records.
//!
//! A record's shape ([`StructType`]) is analyzed once per [`Accessor`] and
//! shared. Binding an instance to it yields a [`Struct`], which resolves
//! field addresses lazily and keeps them for later accesses.
//!
//! - [`Accessor`]: builds and caches shapes under fixed [`Options`].
//! - [`StructType`]: the flat, id-indexed list of [`FieldType`]s, the field
//!   tree and the optional group index.
//! - [`Struct`]: per-instance access through [`FieldMut`] and [`FieldRef`]
//!   views. Writable access allocates empty `Option<Box<_>>` on the way.
//! - [`policy`]: per-field inclusion and expansion decisions.
//!
//! # Examples
//!
//! ```
//! use vc_access::access;
//! use vc_layout::derive::Record;
//!
//! #[derive(Record, Default)]
//! struct P1 {
//!     a: i32,
//!     b: i32,
//!     p2: P2,
//! }
//!
//! #[derive(Record, Default)]
//! struct P2 {
//!     c: i32,
//!     d: i32,
//!     p3: Option<Box<P3>>,
//! }
//!
//! #[derive(Record, Default)]
//! struct P3 {
//!     e: i32,
//!     f: Option<Box<i32>>,
//!     g: Option<Box<Option<Box<i32>>>>,
//! }
//!
//! let mut p1 = P1::default();
//! let mut s = access(&mut p1).unwrap();
//! assert_eq!(s.num_field(), 9);
//!
//! for id in 0..s.num_field() {
//!     if let Some(v) = s.value_at(id).unwrap().into_mut::<i32>() {
//!         *v = id as i32;
//!     }
//! }
//! drop(s);
//!
//! let p3 = p1.p2.p3.unwrap();
//! assert_eq!((p1.a, p1.b, p1.p2.c, p1.p2.d, p3.e), (0, 1, 3, 4, 6));
//! assert_eq!(p3.f.as_deref(), Some(&7));
//! assert_eq!(p3.g.as_deref().and_then(|g| g.as_deref()), Some(&8));
//! ```
#![expect(unsafe_code, reason = "Field resolution works on erased addresses.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod error;
mod field;
mod instance;
mod options;
mod shape;

pub mod cache;
pub mod policy;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use accessor::{Accessor, access, analyze, default_accessor, must_access, must_analyze};
pub use error::AccessError;
pub use field::FieldType;
pub use instance::{FieldMut, FieldRef, Struct};
pub use options::{DEFAULT_MAX_DEPTH, GroupByFn, IteratorFn, Options};
pub use shape::StructType;
