//! Path-addressed mutation of typed records.
//!
//! A [`Model`] mirrors a record's shape as a tree of nodes: nested records
//! become child nodes, `Vec` fields become collection nodes, everything else
//! is a scalar. Dotted key paths are resolved against that tree and the
//! addressed field is written in place:
//!
//! - [`Model::set`] overwrites scalars and records, and appends to
//!   collections (a whole `Vec` of elements, or one fresh element built from a
//!   partial update).
//! - [`Model::map`] applies a batch of key/value pairs, coalescing the pairs
//!   under one top-level field into a single value, so that several fields of
//!   one new collection element land in the same element.
//!
//! Record types describe themselves through [`Reflect`], normally derived:
//!
//! ```
//! use reflex::{Model, Record, Value};
//!
//! #[derive(Debug, Default, Record)]
//! struct Member {
//!     name: String,
//!     plays: String,
//! }
//!
//! #[derive(Debug, Default, Record)]
//! struct Band {
//!     band: String,
//!     member: Vec<Member>,
//! }
//!
//! let mut band = Band::default();
//! let mut model = Model::build(&mut band);
//! model.set("band", "Led Zeppelin".to_string()).unwrap();
//! model
//!     .map([
//!         ("member.name", Value::from("Jimmy Page")),
//!         ("member.plays", Value::from("Guitar")),
//!     ])
//!     .unwrap();
//! drop(model);
//!
//! assert_eq!(band.member.len(), 1);
//! assert_eq!(band.member[0].name, "Jimmy Page");
//! assert_eq!(band.member[0].plays, "Guitar");
//! ```
//!
//! Path segments that name no field are skipped by default. Use
//! [`PathPolicy::Strict`] to have them reported as
//! [`ReflexError::UnresolvedPath`].

extern crate self as reflex;

pub mod error;
pub mod model;
pub mod node;
pub mod path;
pub mod shape;
pub mod value;

pub use error::{ReflexError, ReflexResult};
pub use model::Model;
pub use node::{Handle, Node, Outline};
pub use path::{join_path, split_path, Options, PathPolicy, DEFAULT_DELIMITER};
pub use shape::{Field, Kind, Projection, ProjectionRef, Reflect, Shape};
pub use value::Value;

/// Derive [`Reflect`] for a struct with named fields.
///
/// Field attributes:
///
/// - `#[reflex(rename = "Name")]`: path segment for the field (defaults to
///   the field name)
/// - `#[reflex(skip)]`: leave the field out of the model
/// - `#[reflex(scalar)]`: treat the field as an opaque scalar; its type then
///   only needs `Default`
///
/// The struct itself must implement `Default`.
pub use reflex_derive::Record;
