//! Dynamically typed values passed to [`Model::set_value`](crate::Model::set_value)
//! and [`Model::map`](crate::Model::map).

use std::any::{type_name, Any};
use std::fmt;

/// An owned value of any `'static` type.
///
/// The static type name is captured at construction so that type-mismatch
/// errors can name both sides.
///
/// # Example
///
/// ```
/// use reflex::Value;
///
/// let value = Value::new(42_i64);
/// assert!(value.is::<i64>());
/// assert_eq!(value.downcast::<i64>().unwrap(), 42);
/// ```
pub struct Value {
    inner: Box<dyn Any>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a value.
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub(crate) fn from_boxed(inner: Box<dyn Any>, type_name: &'static str) -> Self {
        Self { inner, type_name }
    }

    /// Name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns true if the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Take the wrapped value as a `T`, handing the value back if it is not one.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        let type_name = self.type_name;
        self.inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Value { inner, type_name })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

macro_rules! value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::new(value)
                }
            }
        )*
    };
}

value_from!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String,
);

/// String literals become owned `String`s; records store text as `String`.
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::new(value.to_owned())
    }
}

impl<T: Any> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::new(value)
    }
}
