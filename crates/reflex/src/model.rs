//! The model: a node tree bound to the storage it addresses.

use std::any::{type_name, Any};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{ReflexError, ReflexResult};
use crate::node::{Handle, Node, Outline};
use crate::path::{split_path, Options, PathPolicy};
use crate::shape::{Kind, Reflect, Shape};
use crate::Value;

/// Storage a model writes through.
enum Storage<'a> {
    /// The caller's record.
    Borrowed(&'a mut dyn Any),
    /// Storage allocated by the model itself.
    Owned(Box<dyn Any>),
}

impl Storage<'_> {
    fn get(&self) -> &dyn Any {
        match self {
            Storage::Borrowed(record) => &**record,
            Storage::Owned(boxed) => boxed.as_ref(),
        }
    }

    fn get_mut(&mut self) -> &mut dyn Any {
        match self {
            Storage::Borrowed(record) => &mut **record,
            Storage::Owned(boxed) => boxed.as_mut(),
        }
    }
}

/// A path-addressable view over a record.
///
/// The model mirrors the record's shape as a tree of [`Node`]s and writes
/// through to the record in place.
///
/// # Example
///
/// ```
/// use reflex::{Model, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct Name {
///     first: String,
///     last: String,
/// }
///
/// #[derive(Debug, Default, Record)]
/// struct Person {
///     name: Name,
///     location: String,
/// }
///
/// let mut person = Person::default();
/// let mut model = Model::build(&mut person);
/// model.set("name.first", "Andrew".to_string()).unwrap();
/// model.set("location", "Aiea, HI".to_string()).unwrap();
/// drop(model);
///
/// assert_eq!(person.name.first, "Andrew");
/// assert_eq!(person.location, "Aiea, HI");
/// ```
pub struct Model<'a> {
    storage: Storage<'a>,
    root: Node,
    options: Options,
}

impl<'a> Model<'a> {
    /// Build a model over `record` with default options.
    pub fn build<T: Reflect>(record: &'a mut T) -> Self {
        Self::with_options(record, Options::default())
    }

    /// Build a model over `record`.
    pub fn with_options<T: Reflect>(record: &'a mut T, options: Options) -> Self {
        Self::over(Storage::Borrowed(record), Shape::of::<T>(), options)
    }

    fn over(storage: Storage<'a>, shape: Shape, options: Options) -> Self {
        let root = Node::build("", shape, Handle::root());
        trace!(
            root = shape.type_name(),
            kind = ?root.kind(),
            nodes = root.node_count(),
            "built model"
        );
        Self {
            storage,
            root,
            options,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Resolve `path` permissively to the node it addresses.
    pub fn resolve(&self, path: &str) -> &Node {
        let node = self
            .root
            .resolve(split_path(path, self.options.delimiter));
        trace!(path, resolved = node.name(), "resolved path");
        node
    }

    /// Build a detached model over fresh storage of `node`'s underlying type.
    ///
    /// The new model never aliases this model's storage and inherits its
    /// options.
    pub fn fresh(&self, node: &Node) -> Model<'static> {
        Model::detached_shape(node.shape(), self.options)
    }

    /// Set the value at `path`.
    ///
    /// Non-collection targets are overwritten. Collection targets are
    /// appended to: a `Vec` of the element type is appended element by
    /// element, anything else is applied to a fresh element which is then
    /// appended.
    pub fn set<T: Any>(&mut self, path: &str, value: T) -> ReflexResult<()> {
        self.set_value(path, Value::new(value))
    }

    /// Dynamically typed form of [`set`](Model::set).
    pub fn set_value(&mut self, path: &str, value: Value) -> ReflexResult<()> {
        let segments = split_path(path, self.options.delimiter);
        self.apply(path, &segments, value)
    }

    fn apply(&mut self, path: &str, segments: &[&str], value: Value) -> ReflexResult<()> {
        let (target, tail) = self.root.locate(path, segments, self.options.policy)?;
        let slot_shape = target.slot_shape();

        if target.kind() != Kind::Collection {
            let slot = target.handle().slot_mut(self.storage.get_mut())?;
            return match slot_shape.assign(slot, value) {
                Ok(()) => {
                    debug!(path, target = target.name(), "assigned value");
                    Ok(())
                }
                Err(value) => Err(ReflexError::type_mismatch(
                    path,
                    slot_shape.type_name(),
                    value.type_name(),
                )),
            };
        }

        let slot = target.handle().slot_mut(self.storage.get_mut())?;
        let value = match slot_shape.extend(slot, value) {
            Ok(()) => {
                debug!(path, target = target.name(), "appended collection");
                return Ok(());
            }
            Err(value) => value,
        };

        let mut element = Model::detached_shape(target.shape(), self.options);
        element.apply(path, tail, value)?;
        let element = element.into_value()?;

        let slot = target.handle().slot_mut(self.storage.get_mut())?;
        match slot_shape.push(slot, element) {
            Ok(()) => {
                debug!(path, target = target.name(), "appended element");
                Ok(())
            }
            Err(element) => Err(ReflexError::type_mismatch(
                path,
                target.shape().type_name(),
                element.type_name(),
            )),
        }
    }

    /// Apply a batch of key/value pairs, coalescing pairs under the same
    /// top-level field into one fresh value written back once.
    ///
    /// `{"member.name": .., "member.plays": ..}` appends exactly one member.
    /// A pair addressing a collection group as a whole (`"member"`) is
    /// appended as given, in bulk or as one element.
    ///
    /// Groups are written back in the order they were first seen, after every
    /// pair has been applied. A failing pair aborts the batch before anything
    /// is written back; a failing write-back leaves earlier groups written.
    pub fn map<I, K>(&mut self, pairs: I) -> ReflexResult<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let options = self.options;
        let mut pending: IndexMap<&'static str, Group> = IndexMap::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            let segments = split_path(key, options.delimiter);
            let (group, tail) = self.root.group(key, &segments, options.policy)?;
            let entry = pending.entry(group.name()).or_default();

            if group.kind() == Kind::Collection && tail.is_empty() {
                entry.whole.push(value);
                continue;
            }
            entry
                .fresh
                .get_or_insert_with(|| Model::detached_shape(group.shape(), options))
                .apply(key, tail, value)?;
        }

        for (name, group) in pending {
            let segments: Vec<&str> = if name.is_empty() { Vec::new() } else { vec![name] };
            debug!(group = name, whole = group.whole.len(), "writing back group");
            for value in group.whole {
                self.apply(name, &segments, value)?;
            }
            if let Some(fresh) = group.fresh {
                let value = fresh.into_value()?;
                self.apply(name, &segments, value)?;
            }
        }
        Ok(())
    }

    /// Borrow the value at `path` as a `T`.
    pub fn get<T: Any>(&self, path: &str) -> ReflexResult<&T> {
        let segments = split_path(path, self.options.delimiter);
        let target = addressed(&self.root, self.options, path, &segments)?;
        target
            .handle()
            .slot(self.storage.get())?
            .downcast_ref::<T>()
            .ok_or_else(|| {
                ReflexError::type_mismatch(path, target.slot_shape().type_name(), type_name::<T>())
            })
    }

    /// Mutably borrow the value at `path` as a `T`.
    pub fn get_mut<T: Any>(&mut self, path: &str) -> ReflexResult<&mut T> {
        let segments = split_path(path, self.options.delimiter);
        let target = addressed(&self.root, self.options, path, &segments)?;
        let expected = target.slot_shape().type_name();
        target
            .handle()
            .slot_mut(self.storage.get_mut())?
            .downcast_mut::<T>()
            .ok_or_else(|| ReflexError::type_mismatch(path, expected, type_name::<T>()))
    }

    /// Every path addressable from the root.
    pub fn paths(&self) -> Vec<String> {
        self.root.paths(self.options.delimiter)
    }

    /// Serialisable snapshot of the node tree.
    pub fn outline(&self) -> Outline {
        self.root.outline()
    }

    /// Consume a detached model and return its value.
    pub fn into_value(self) -> ReflexResult<Value> {
        match self.storage {
            Storage::Owned(boxed) => Ok(Value::from_boxed(boxed, self.root.slot_shape().type_name())),
            Storage::Borrowed(_) => Err(ReflexError::BorrowedStorage),
        }
    }

    /// Typed form of [`into_value`](Model::into_value).
    pub fn into_inner<T: Any>(self) -> ReflexResult<T> {
        let value = self.into_value()?;
        value
            .downcast::<T>()
            .map_err(|value| ReflexError::type_mismatch("", type_name::<T>(), value.type_name()))
    }
}

impl Model<'static> {
    /// Build a model over fresh storage holding `T::default()`.
    pub fn detached<T: Reflect>() -> Self {
        Self::detached_shape(Shape::of::<T>(), Options::default())
    }

    fn detached_shape(shape: Shape, options: Options) -> Self {
        Self::over(Storage::Owned(shape.allocate()), shape, options)
    }
}

/// Values gathered for one `map` group.
#[derive(Default)]
struct Group {
    /// Whole values for a collection group.
    whole: Vec<Value>,
    /// Value assembled from the group's partial pairs.
    fresh: Option<Model<'static>>,
}

/// Node a read addresses. Reads never reach into a collection element, so
/// under the strict policy a path running past a collection is unresolved.
fn addressed<'n>(
    root: &'n Node,
    options: Options,
    path: &str,
    segments: &[&str],
) -> ReflexResult<&'n Node> {
    let (target, tail) = root.locate(path, segments, options.policy)?;
    match tail.first() {
        Some(segment) if options.policy == PathPolicy::Strict => {
            Err(ReflexError::unresolved_path(path, *segment))
        }
        _ => Ok(target),
    }
}

impl Node {
    /// Build a detached model of this node's underlying type with default
    /// options. See [`Model::fresh`] to inherit a model's options.
    pub fn new_model(&self) -> Model<'static> {
        Model::detached_shape(self.shape(), Options::default())
    }
}

impl std::fmt::Debug for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("root", &self.root.slot_shape())
            .field("options", &self.options)
            .field("owned", &matches!(self.storage, Storage::Owned(_)))
            .finish()
    }
}
