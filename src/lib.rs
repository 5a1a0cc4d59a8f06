//! Cached field access for nested records.
//!
//! This crate only re-exports the workspace crates:
//!
//! - [`layout`]: static record descriptors and `#[derive(Record)]`.
//! - [`access`]: shape analysis, the shape cache and per-instance accessors.
//! - [`ptr`]: the type-erased pointers used for address arithmetic.
//! - [`utils`]: hash containers shared by the other crates.
//!
//! # Examples
//!
//! ```
//! use vc_field::layout::derive::Record;
//!
//! #[derive(Record, Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let mut p = Point::default();
//! let mut s = vc_field::access::access(&mut p).unwrap();
//! *s.value_at(1).unwrap().downcast_mut::<i32>().unwrap() = 7;
//! drop(s);
//!
//! assert_eq!(p.y, 7);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_access as access;
pub use vc_layout as layout;
pub use vc_ptr as ptr;
pub use vc_utils as utils;
