use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Path, Type, WhereClause, parse_quote};

use crate::RECORD_ATTRIBUTE_NAME;
use crate::path;

// -----------------------------------------------------------------------------
// Parsed input

struct RecordField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    tag: Option<LitStr>,
}

/// A struct with named fields, ready for code generation.
pub(crate) struct RecordData<'a> {
    vc_layout_path: Path,
    ident: &'a Ident,
    generics: &'a Generics,
    fields: Vec<RecordField<'a>>,
}

impl<'a> RecordData<'a> {
    pub fn parse(ast: &'a DeriveInput) -> syn::Result<Self> {
        if let Some(attr) = ast
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident(RECORD_ATTRIBUTE_NAME))
        {
            return Err(syn::Error::new_spanned(
                attr,
                "`record` attributes are only allowed on fields",
            ));
        }

        if let Some(param) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                param,
                "`Record` cannot be derived for types with lifetime parameters",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new_spanned(
                        &ast.ident,
                        "`Record` requires a struct with named fields",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new_spanned(
                    data.enum_token,
                    "`Record` cannot be derived for enums",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new_spanned(
                    data.union_token,
                    "`Record` cannot be derived for unions",
                ));
            }
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let mut tag: Option<LitStr> = None;
            let mut skip = false;

            for attr in &field.attrs {
                if !attr.path().is_ident(RECORD_ATTRIBUTE_NAME) {
                    continue;
                }
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("tag") {
                        if tag.is_some() {
                            return Err(meta.error("duplicate `tag`"));
                        }
                        tag = Some(meta.value()?.parse()?);
                        Ok(())
                    } else if meta.path.is_ident("skip") {
                        skip = true;
                        Ok(())
                    } else {
                        Err(meta.error("unsupported `record` attribute, expected `tag` or `skip`"))
                    }
                })?;
            }

            if skip {
                continue;
            }

            let Some(ident) = field.ident.as_ref() else {
                return Err(syn::Error::new_spanned(field, "missing field name"));
            };

            fields.push(RecordField {
                ident,
                ty: &field.ty,
                tag,
            });
        }

        Ok(Self {
            vc_layout_path: path::vc_layout(),
            ident: &ast.ident,
            generics: &ast.generics,
            fields,
        })
    }

    /// A `static` inside a generic function is shared by every
    /// instantiation, so any generic parameter forces the keyed cell.
    #[inline]
    fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    fn where_clause(&self, typed_: &TokenStream) -> WhereClause {
        let mut clause = self
            .generics
            .where_clause
            .clone()
            .unwrap_or_else(|| WhereClause {
                where_token: Default::default(),
                predicates: Punctuated::new(),
            });

        if self.is_generic() {
            for param in self.generics.type_params() {
                let ident = &param.ident;
                clause.predicates.push(parse_quote!(#ident: #typed_));
            }
            for field in &self.fields {
                let ty = field.ty;
                clause.predicates.push(parse_quote!(#ty: #typed_));
            }
        }

        clause
    }

    // -------------------------------------------------------------------------
    // Code generation

    /// Generates `unsafe impl Typed for ...`.
    pub fn impl_typed(&self) -> TokenStream {
        let vc_layout_path = &self.vc_layout_path;
        let typed_ = path::typed_(vc_layout_path);
        let type_info_ = path::type_info_(vc_layout_path);
        let record_info_ = path::record_info_(vc_layout_path);
        let member_info_ = path::member_info_(vc_layout_path);

        let ident = self.ident;
        let (impl_generics, ty_generics, _) = self.generics.split_for_impl();
        let where_clause = self.where_clause(&typed_);

        let members = self.fields.iter().map(|field| {
            let field_ident = field.ident;
            let ty = field.ty;
            let name = field_ident.unraw().to_string();
            let with_tag = field.tag.as_ref().map(|tag| quote!(.with_tag(#tag)));
            quote! {
                #member_info_::new::<#ty>(
                    #name,
                    ::core::mem::offset_of!(#ident #ty_generics, #field_ident),
                ) #with_tag
            }
        });

        // Offsets and member types are taken from the struct definition
        // itself, which is what `RecordInfo::new` and `Typed` require.
        let info_tokens = quote! {
            #type_info_::Record(unsafe {
                #record_info_::new::<Self>(&[
                    #(#members),*
                ])
            })
        };

        let cell_tokens = if self.is_generic() {
            let info_cell = path::generic_type_info_cell_(vc_layout_path);
            quote! {
                static CELL: #info_cell = #info_cell::new();
                CELL.get_or_insert::<Self>(|| #info_tokens)
            }
        } else {
            let info_cell = path::non_generic_type_info_cell_(vc_layout_path);
            quote! {
                static CELL: #info_cell = #info_cell::new();
                CELL.get_or_init(|| #info_tokens)
            }
        };

        quote! {
            #[automatically_derived]
            #[allow(unsafe_code)]
            unsafe impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
                fn type_info() -> &'static #type_info_ {
                    #cell_tokens
                }
            }
        }
    }
}
