//! Static shape descriptors.
//!
//! Every type that can appear in a [`Model`](crate::Model) implements
//! [`Reflect`]. A [`Shape`] captures one such type as a set of monomorphised
//! function pointers, so the model can allocate, assign and append values of
//! that type without knowing it statically. Record types list their fields as
//! [`Field`] entries, each carrying projections bound to one field slot.
//!
//! Records normally get their `Reflect` impl from `#[derive(Record)]`.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Value;

/// How a node behaves under traversal and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Replaced wholesale on set.
    Scalar,
    /// Has named fields; expanded into child nodes.
    Record,
    /// Appended to on set.
    Collection,
}

/// A type that can be described to the model builder.
///
/// Scalars only need an empty impl. Collections override [`kind`],
/// [`element`], [`extend_from`] and [`push_element`]; records override
/// [`kind`] and [`fields`].
///
/// [`kind`]: Reflect::kind
/// [`element`]: Reflect::element
/// [`extend_from`]: Reflect::extend_from
/// [`push_element`]: Reflect::push_element
/// [`fields`]: Reflect::fields
pub trait Reflect: Any + Default {
    fn kind() -> Kind {
        Kind::Scalar
    }

    /// Field table, in declaration order. Only meaningful for records.
    fn fields() -> Vec<Field> {
        Vec::new()
    }

    /// Element shape. Only meaningful for collections.
    fn element() -> Option<Shape> {
        None
    }

    /// Append every element of `value` if it is a collection of the same type.
    fn extend_from(&mut self, value: Value) -> Result<(), Value> {
        Err(value)
    }

    /// Append `value` as a single element.
    fn push_element(&mut self, value: Value) -> Result<(), Value> {
        Err(value)
    }
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(impl Reflect for $ty {})*
    };
}

scalar!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

impl<T: Any> Reflect for Option<T> {}

impl<T: Reflect> Reflect for Vec<T> {
    fn kind() -> Kind {
        Kind::Collection
    }

    fn element() -> Option<Shape> {
        Some(Shape::of::<T>())
    }

    fn extend_from(&mut self, value: Value) -> Result<(), Value> {
        let items = value.downcast::<Vec<T>>()?;
        self.extend(items);
        Ok(())
    }

    fn push_element(&mut self, value: Value) -> Result<(), Value> {
        let item = value.downcast::<T>()?;
        self.push(item);
        Ok(())
    }
}

// ── Shape ─────────────────────────────────────────────────────────────────

type Allocate = fn() -> Box<dyn Any>;
type Write = fn(&mut dyn Any, Value) -> Result<(), Value>;

/// Descriptor of one [`Reflect`] type.
#[derive(Clone, Copy)]
pub struct Shape {
    type_name: &'static str,
    type_id: TypeId,
    kind: Kind,
    allocate: Allocate,
    assign: Write,
    extend: Write,
    push: Write,
    fields: fn() -> Vec<Field>,
    element: fn() -> Option<Shape>,
}

impl Shape {
    /// Shape of a [`Reflect`] type.
    pub fn of<T: Reflect>() -> Self {
        Self {
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind: T::kind(),
            allocate: allocate::<T>,
            assign: assign::<T>,
            extend: extend::<T>,
            push: push::<T>,
            fields: T::fields,
            element: T::element,
        }
    }

    /// Shape of a type treated as an opaque scalar.
    ///
    /// Used for record fields marked `#[reflex(scalar)]`, whose type need not
    /// implement [`Reflect`].
    pub fn opaque<T: Any + Default>() -> Self {
        Self {
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind: Kind::Scalar,
            allocate: allocate::<T>,
            assign: assign::<T>,
            extend: reject,
            push: reject,
            fields: Vec::new,
            element: none,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn fields(&self) -> Vec<Field> {
        (self.fields)()
    }

    pub fn element(&self) -> Option<Shape> {
        (self.element)()
    }

    /// Allocate independent storage holding the type's default value.
    pub(crate) fn allocate(&self) -> Box<dyn Any> {
        (self.allocate)()
    }

    /// Overwrite `slot` with `value`.
    pub(crate) fn assign(&self, slot: &mut dyn Any, value: Value) -> Result<(), Value> {
        (self.assign)(slot, value)
    }

    /// Bulk-append `value` to the collection in `slot`.
    pub(crate) fn extend(&self, slot: &mut dyn Any, value: Value) -> Result<(), Value> {
        (self.extend)(slot, value)
    }

    /// Append `value` as one element of the collection in `slot`.
    pub(crate) fn push(&self, slot: &mut dyn Any, value: Value) -> Result<(), Value> {
        (self.push)(slot, value)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.kind == other.kind
    }
}

fn allocate<T: Any + Default>() -> Box<dyn Any> {
    Box::new(T::default())
}

fn assign<T: Any>(slot: &mut dyn Any, value: Value) -> Result<(), Value> {
    match slot.downcast_mut::<T>() {
        Some(slot) => {
            *slot = value.downcast::<T>()?;
            Ok(())
        }
        None => Err(value),
    }
}

fn extend<T: Reflect>(slot: &mut dyn Any, value: Value) -> Result<(), Value> {
    match slot.downcast_mut::<T>() {
        Some(slot) => slot.extend_from(value),
        None => Err(value),
    }
}

fn push<T: Reflect>(slot: &mut dyn Any, value: Value) -> Result<(), Value> {
    match slot.downcast_mut::<T>() {
        Some(slot) => slot.push_element(value),
        None => Err(value),
    }
}

fn reject(_: &mut dyn Any, value: Value) -> Result<(), Value> {
    Err(value)
}

fn none() -> Option<Shape> {
    None
}

// ── Field ─────────────────────────────────────────────────────────────────

/// Projection from a record to one of its field slots.
pub type Projection = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// Shared counterpart of [`Projection`].
pub type ProjectionRef = fn(&dyn Any) -> Option<&dyn Any>;

/// One entry of a record's field table.
#[derive(Clone, Copy)]
pub struct Field {
    name: &'static str,
    shape: Shape,
    project: Projection,
    project_ref: ProjectionRef,
}

impl Field {
    pub fn new(
        name: &'static str,
        shape: Shape,
        project: Projection,
        project_ref: ProjectionRef,
    ) -> Self {
        Self {
            name,
            shape,
            project,
            project_ref,
        }
    }

    /// Path segment addressing this field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn project<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.project)(record)
    }

    pub fn project_ref<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.project_ref)(record)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}
