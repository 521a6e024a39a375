//! Parsing logic for the Record derive macro.

use darling::{ast, FromDeriveInput, FromField};
use syn::ext::IdentExt;
use syn::{Generics, Ident, Type};

/// Parsed struct-level input.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(reflex), supports(struct_named))]
pub struct RecordInput {
    pub ident: Ident,

    pub generics: Generics,

    pub data: ast::Data<(), FieldInput>,
}

impl RecordInput {
    /// Get the fields as a vector.
    pub fn fields(&self) -> Vec<&FieldInput> {
        self.data
            .as_ref()
            .take_struct()
            .map(|s| s.fields.to_vec())
            .unwrap_or_default()
    }
}

/// Parsed field-level options.
#[derive(Debug, FromField)]
#[darling(attributes(reflex))]
pub struct FieldInput {
    pub ident: Option<Ident>,

    pub ty: Type,

    /// Path segment for the field.
    #[darling(default)]
    pub rename: Option<String>,

    /// Leave the field out of the model.
    #[darling(default)]
    pub skip: bool,

    /// Describe the field as an opaque scalar.
    #[darling(default)]
    pub scalar: bool,
}

impl FieldInput {
    /// Get the field identifier (panics if None).
    pub fn ident(&self) -> &Ident {
        self.ident.as_ref().expect("named field required")
    }

    /// Path segment addressing this field.
    pub fn path_name(&self) -> String {
        self.rename
            .clone()
            .unwrap_or_else(|| self.ident().unraw().to_string())
    }

    pub fn is_included(&self) -> bool {
        !self.skip
    }
}
