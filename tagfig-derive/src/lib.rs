//! Derive macro for [`tagfig::Record`](https://docs.rs/tagfig).
//!
//! Generates the field table the struct walker consumes: one `Field` per
//! visible struct field, carrying its declared name, its tags and a mutable
//! handle to the value.
//!
//! ```ignore
//! #[derive(Record, Default)]
//! pub struct Server {
//!     #[tag(default = "6060", env)]
//!     pub port: u16,
//!
//!     #[field(nested)]
//!     pub postgres: Postgres,
//!
//!     #[field(skip)]
//!     pub cache: SomeOpaqueHandle,
//!
//!     secret_seed: u64, // private: never introspected
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Token, Visibility, parse_macro_input};

/// Derive `tagfig::Record` for a struct with named fields.
///
/// # Attributes
///
/// - `#[field(nested)]` - the field is itself a `Record` and is expanded by the walker
/// - `#[field(skip)]` - the field is never introspected
/// - `#[field(rename = "Name")]` - override the introspected field name
/// - `#[tag(ns = "value", other)]` - attach tags; a bare namespace is present but empty
///
/// Fields without `pub` visibility are skipped.
#[proc_macro_derive(Record, attributes(field, tag))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[derive(Default)]
struct FieldAttrs {
    nested: bool,
    skip: bool,
    rename: Option<String>,
    tags: Vec<(String, String)>,
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if attr.path().is_ident("field") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nested") {
                    attrs.nested = true;
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    attrs.rename = Some(lit.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `nested`, `skip` or `rename = \"...\"`"))
                }
            })?;
        } else if attr.path().is_ident("tag") {
            attr.parse_nested_meta(|meta| {
                let namespace = meta
                    .path
                    .get_ident()
                    .ok_or_else(|| meta.error("tag namespace must be a plain identifier"))?
                    .unraw()
                    .to_string();
                let value = if meta.input.peek(Token![=]) {
                    meta.value()?.parse::<LitStr>()?.value()
                } else {
                    String::new()
                };
                attrs.tags.push((namespace, value));
                Ok(())
            })?;
        }
    }

    if attrs.nested && attrs.skip {
        return Err(Error::new_spanned(
            field,
            "`nested` and `skip` cannot be combined",
        ));
    }

    Ok(attrs)
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        ));
    };

    let mut field_exprs = Vec::new();
    let mut zero_exprs = Vec::new();

    for field in &named.named {
        let attrs = parse_field_attrs(field)?;
        if attrs.skip || matches!(field.vis, Visibility::Inherited) {
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };
        let name = attrs
            .rename
            .unwrap_or_else(|| ident.unraw().to_string());
        let tag_pairs = attrs.tags.iter().map(|(k, v)| quote! { (#k, #v) });
        let tags = quote! { ::tagfig::Tags::new(&[ #(#tag_pairs),* ]) };

        if attrs.nested {
            field_exprs.push(quote! {
                ::tagfig::Field::record(#name, #tags, &mut self.#ident)
            });
            zero_exprs.push(quote! {
                ::tagfig::Record::is_zero(&self.#ident)
            });
        } else {
            field_exprs.push(quote! {
                ::tagfig::Field::value(#name, #tags, &mut self.#ident)
            });
            zero_exprs.push(quote! {
                ::tagfig::Coerce::is_zero(&self.#ident)
            });
        }
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::tagfig::Record for #ident #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::tagfig::Field<'_>> {
                ::std::vec![ #(#field_exprs),* ]
            }

            fn is_zero(&self) -> bool {
                true #( && #zero_exprs )*
            }
        }
    })
}
