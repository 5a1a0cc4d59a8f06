//! Paths into `vc_layout` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_layout` crate.
///
/// 1. For crates that depend on `vc_layout`, `::vc_layout` is returned.
/// 2. For crates that depend on `vc_field`, `::vc_field::layout` is returned.
/// 3. Otherwise `::vc_layout` is returned, which may be incorrect.
///
/// Reading the manifest is slow, so the path is fetched once per derive and
/// passed around.
pub(crate) fn vc_layout() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_layout"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn typed_(vc_layout_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_layout_path::info::Typed
    }
}

#[inline(always)]
pub(crate) fn type_info_(vc_layout_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_layout_path::info::TypeInfo
    }
}

#[inline(always)]
pub(crate) fn record_info_(vc_layout_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_layout_path::info::RecordInfo
    }
}

#[inline(always)]
pub(crate) fn member_info_(vc_layout_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_layout_path::info::MemberInfo
    }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(vc_layout_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_layout_path::cell::NonGenericTypeInfoCell
    }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(vc_layout_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_layout_path::cell::GenericTypeInfoCell
    }
}
