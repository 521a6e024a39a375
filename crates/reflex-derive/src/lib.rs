//! Derive macro for the reflex `Reflect` trait.
//!
//! `#[derive(Record)]` generates the field-descriptor table the model builder
//! walks: one entry per field with its path name, its shape and a pair of
//! projections bound to the field slot.
//!
//! # Usage
//!
//! ```ignore
//! use reflex::Record;
//!
//! #[derive(Default, Record)]
//! struct Movie {
//!     title: String,
//!     year: i32,
//! }
//!
//! #[derive(Default, Record)]
//! struct Series {
//!     #[reflex(rename = "Name")]
//!     name: String,
//!     movies: Vec<Movie>,
//!     #[reflex(skip)]
//!     cached_len: usize,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parse;

/// Derive `reflex::Reflect` for a struct with named fields.
///
/// # Field attributes
///
/// - `#[reflex(rename = "name")]`: path segment used for the field
/// - `#[reflex(skip)]`: exclude the field from the model
/// - `#[reflex(scalar)]`: describe the field as an opaque scalar, so its type
///   only needs `Default` rather than `Reflect`
#[proc_macro_derive(Record, attributes(reflex))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
