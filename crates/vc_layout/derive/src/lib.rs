//! See [`Record`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod path;
mod record;

// -----------------------------------------------------------------------------
// Macros

/// # Record Layout Derivation
///
/// `#[derive(Record)]` implements the unsafe trait `Typed` for a struct with
/// named fields. The generated `TypeInfo::Record` lists every field in
/// declaration order with its name, byte offset (`core::mem::offset_of!`)
/// and declared type, all read from the struct definition, so the generated
/// `unsafe impl` upholds the trait's contract.
///
/// Every field type must implement `Typed` itself.
///
/// Tuple structs, unit structs, enums, unions and types with lifetime
/// parameters are rejected.
///
/// ## Tags
///
/// A field may carry an opaque tag string. It is stored verbatim and never
/// interpreted.
///
/// ```rust, ignore
/// #[derive(Record)]
/// struct User {
///     #[record(tag = "json:\"name\" db:\"user_name\"")]
///     name: String,
/// }
/// ```
///
/// ## Skipping fields
///
/// A field whose type cannot implement `Typed` can be left out entirely. It
/// will not appear in the record's members.
///
/// ```rust, ignore
/// #[derive(Record)]
/// struct Cache {
///     hits: u64,
///     #[record(skip)]
///     entries: std::collections::HashMap<u64, String>,
/// }
/// ```
///
/// ## Generics
///
/// Type parameters get a `Typed` bound and the info is stored per concrete
/// instantiation.
///
/// ```rust, ignore
/// #[derive(Record)]
/// struct Pair<T> {
///     left: T,
///     right: Option<Box<T>>,
/// }
/// ```
///
/// These attributes can only be applied at the field level.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match record::RecordData::parse(&ast) {
        Ok(data) => data.impl_typed().into(),
        Err(err) => err.into_compile_error().into(),
    }
}
