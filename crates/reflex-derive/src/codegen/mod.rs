//! Code generation for the Record derive macro.

mod reflect;

use std::collections::HashSet;

use crate::parse::RecordInput;
use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Main entry point for code generation.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = RecordInput::from_derive_input(input)
        .map_err(|e| syn::Error::new_spanned(input, e.to_string()))?;

    // Field projections are plain fn items, which cannot be generic.
    if !parsed.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &parsed.generics,
            "#[derive(Record)] does not support generic structs",
        ));
    }

    let mut seen = HashSet::new();
    for field in parsed.fields() {
        if field.skip && (field.rename.is_some() || field.scalar) {
            return Err(syn::Error::new_spanned(
                field.ident(),
                "#[reflex(skip)] cannot be combined with #[reflex(rename)] or #[reflex(scalar)]",
            ));
        }

        if field.is_included() && !seen.insert(field.path_name()) {
            return Err(syn::Error::new_spanned(
                field.ident(),
                format!("duplicate path name `{}`", field.path_name()),
            ));
        }
    }

    reflect::generate(&parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_expand_rejects_generics() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> {
                inner: T,
            }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("generic"));
    }

    #[test]
    fn test_expand_rejects_duplicate_names() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                #[reflex(rename = "name")]
                full_name: String,
                name: String,
            }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("duplicate path name `name`"));
    }

    #[test]
    fn test_expand_rejects_skip_with_rename() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                #[reflex(skip, rename = "Name")]
                name: String,
            }
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn test_expand_ok() {
        let input: DeriveInput = parse_quote! {
            struct Person {
                name: String,
                #[reflex(skip)]
                cache: usize,
            }
        };
        let tokens = expand(&input).unwrap().to_string();
        assert!(tokens.contains("Reflect for Person"));
        assert!(tokens.contains("\"name\""));
        assert!(!tokens.contains("\"cache\""));
    }
}
