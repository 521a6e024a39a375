//! `Reflect` impl generation.
//!
//! Each included field becomes one `::reflex::Field` entry. Its projections
//! are emitted as nested fn items so they coerce to the `Projection` fn
//! pointer types without closure lifetime inference.

use crate::parse::{FieldInput, RecordInput};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Generate `impl ::reflex::Reflect` for the record.
pub fn generate(input: &RecordInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    let entries: Vec<TokenStream> = input
        .fields()
        .into_iter()
        .filter(|f| f.is_included())
        .map(|f| field_entry(struct_name, f))
        .collect();

    Ok(quote! {
        impl ::reflex::Reflect for #struct_name {
            fn kind() -> ::reflex::Kind {
                ::reflex::Kind::Record
            }

            fn fields() -> ::std::vec::Vec<::reflex::Field> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

/// Generate the `::reflex::Field` expression for one field.
fn field_entry(struct_name: &syn::Ident, field: &FieldInput) -> TokenStream {
    let field_name = field.ident();
    let field_ty = &field.ty;
    let path_name = field.path_name();
    let project = format_ident!("__reflex_project_{}", field_name);
    let project_ref = format_ident!("__reflex_project_ref_{}", field_name);

    let shape = if field.scalar {
        quote! { ::reflex::Shape::opaque::<#field_ty>() }
    } else {
        quote! { ::reflex::Shape::of::<#field_ty>() }
    };

    quote! {
        {
            #[allow(non_snake_case)]
            fn #project(
                record: &mut dyn ::std::any::Any,
            ) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                record
                    .downcast_mut::<#struct_name>()
                    .map(|record| &mut record.#field_name as &mut dyn ::std::any::Any)
            }

            #[allow(non_snake_case)]
            fn #project_ref(
                record: &dyn ::std::any::Any,
            ) -> ::std::option::Option<&dyn ::std::any::Any> {
                record
                    .downcast_ref::<#struct_name>()
                    .map(|record| &record.#field_name as &dyn ::std::any::Any)
            }

            ::reflex::Field::new(#path_name, #shape, #project, #project_ref)
        }
    }
}
