//! Static layout descriptors for records.
//!
//! A type that implements [`Typed`](info::Typed) exposes a `&'static`
//! [`TypeInfo`](info::TypeInfo) describing how it is laid out in memory:
//!
//! - **Record**: a struct with named members. Each [`MemberInfo`](info::MemberInfo)
//!   carries the member name, byte offset, declared type and an opaque tag string.
//! - **Pointer**: an indirection such as `Box<T>` or `Option<Box<T>>`.
//!   [`PointerInfo`](info::PointerInfo) knows how to follow it and how to fill
//!   it with a default target when it is empty.
//! - **Opaque**: everything else (`i32`, `String`, `Vec<T>`, ...). Its inside
//!   is never inspected.
//!
//! Records are usually described through `#[derive(Record)]`:
//!
//! ```
//! use vc_layout::derive::Record;
//! use vc_layout::info::Typed;
//!
//! #[derive(Record, Default)]
//! struct Node {
//!     #[record(tag = "json:\"value\"")]
//!     value: u32,
//!     next: Option<Box<Node>>,
//! }
//!
//! let info = Node::type_info().as_record().unwrap();
//! assert_eq!(info.len(), 2);
//! assert_eq!(info.member_at(0).unwrap().tag(), "json:\"value\"");
//! assert!(info.member("next").unwrap().type_info().is_pointer());
//! ```
#![expect(unsafe_code, reason = "Pointer vtables dereference erased addresses.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// Generated code refers to `::vc_layout`, which must also resolve inside
// this crate's own tests.
extern crate self as vc_layout;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod cell;
pub mod impls;
pub mod info;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use vc_layout_derive as derive;
