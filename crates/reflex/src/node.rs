//! Model nodes: the addressable tree mirroring a record's shape.

use std::any::Any;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ReflexError, ReflexResult};
use crate::path::{join_path, PathPolicy};
use crate::shape::{Field, Kind, Shape};

// ── Handle ────────────────────────────────────────────────────────────────

/// The value handle of a node: the chain of field projections leading from
/// the model's root storage to the node's slot.
#[derive(Debug, Clone, Default)]
pub struct Handle {
    steps: Vec<Field>,
}

impl Handle {
    /// Handle addressing the root storage itself.
    pub fn root() -> Self {
        Self::default()
    }

    fn child(&self, field: Field) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(field);
        Self { steps }
    }

    /// Field names from the root to this slot.
    pub fn segments(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|field| field.name())
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Borrow the addressed slot mutably.
    pub(crate) fn slot_mut<'s>(&self, root: &'s mut dyn Any) -> ReflexResult<&'s mut dyn Any> {
        let mut slot = root;
        for field in &self.steps {
            slot = match field.project(slot) {
                Some(next) => next,
                None => return Err(ReflexError::detached_handle(self.dotted())),
            };
        }
        Ok(slot)
    }

    /// Borrow the addressed slot.
    pub(crate) fn slot<'s>(&self, root: &'s dyn Any) -> ReflexResult<&'s dyn Any> {
        let mut slot = root;
        for field in &self.steps {
            slot = field
                .project_ref(slot)
                .ok_or_else(|| ReflexError::detached_handle(self.dotted()))?;
        }
        Ok(slot)
    }

    fn dotted(&self) -> String {
        let segments: Vec<&str> = self.segments().collect();
        join_path(segments.as_slice(), '.')
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(&other.steps)
                .all(|(a, b)| a.name() == b.name() && a.shape() == b.shape())
    }
}

// ── Node ──────────────────────────────────────────────────────────────────

/// One addressable location within a record's structure.
#[derive(Debug, Clone)]
pub struct Node {
    name: &'static str,
    kind: Kind,
    shape: Shape,
    slot: Shape,
    handle: Handle,
    children: IndexMap<&'static str, Node>,
}

impl Node {
    /// Build the tree for a value of shape `slot` reachable through `handle`.
    ///
    /// Record nodes are expanded eagerly, field by field in declaration order.
    /// A collection node addresses its element type and has no children.
    pub(crate) fn build(name: &'static str, slot: Shape, handle: Handle) -> Self {
        let kind = slot.kind();
        let shape = match kind {
            Kind::Collection => slot.element().unwrap_or(slot),
            Kind::Scalar | Kind::Record => slot,
        };

        let mut children = IndexMap::new();
        if kind == Kind::Record {
            for field in slot.fields() {
                let child = Node::build(field.name(), field.shape(), handle.child(field));
                children.insert(field.name(), child);
            }
        }

        Self {
            name,
            kind,
            shape,
            slot,
            handle,
            children,
        }
    }

    /// Field name this node was reached under; empty for the root.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Underlying type: the element type for a collection node.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Type actually stored in the node's slot.
    pub fn slot_shape(&self) -> Shape {
        self.slot
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Children in field declaration order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children.values().map(Node::node_count).sum::<usize>()
    }

    /// Walk `segments` permissively: a segment naming a child descends into
    /// it, any other segment is skipped.
    ///
    /// Never fails and never creates nodes.
    pub fn resolve<'p>(&self, segments: impl IntoIterator<Item = &'p str>) -> &Node {
        let mut target = self;
        for segment in segments {
            if let Some(child) = target.children.get(segment) {
                target = child;
            }
        }
        target
    }

    /// Locate the node addressed by `segments` under `policy`.
    ///
    /// Returns the node and the segments to apply to a fresh element when the
    /// node is a collection: the segments after the last one that matched.
    /// When nothing matched, that is the whole path.
    pub(crate) fn locate<'n, 's, 'p>(
        &'n self,
        path: &str,
        segments: &'s [&'p str],
        policy: PathPolicy,
    ) -> ReflexResult<(&'n Node, &'s [&'p str])> {
        match policy {
            PathPolicy::Permissive => {
                let mut target = self;
                let mut tail = segments;
                for (i, segment) in segments.iter().enumerate() {
                    if let Some(child) = target.children.get(*segment) {
                        target = child;
                        tail = &segments[i + 1..];
                    }
                }
                Ok((target, tail))
            }
            PathPolicy::Strict => {
                let mut target = self;
                for (i, segment) in segments.iter().enumerate() {
                    if target.kind == Kind::Collection {
                        return Ok((target, &segments[i..]));
                    }
                    target = target
                        .children
                        .get(*segment)
                        .ok_or_else(|| ReflexError::unresolved_path(path, *segment))?;
                }
                Ok((target, &[]))
            }
        }
    }

    /// Locate the top-level node a path is grouped under by
    /// [`Model::map`](crate::Model::map).
    ///
    /// Permissive: the first child named by any segment, else this node.
    /// Strict: the child named by the first segment, or this node when it is
    /// a collection. The returned segments are the ones after the group's
    /// own segment, to apply to the group's fresh value.
    pub(crate) fn group<'n, 's, 'p>(
        &'n self,
        path: &str,
        segments: &'s [&'p str],
        policy: PathPolicy,
    ) -> ReflexResult<(&'n Node, &'s [&'p str])> {
        match policy {
            PathPolicy::Permissive => Ok(segments
                .iter()
                .enumerate()
                .find_map(|(i, segment)| {
                    self.children
                        .get(*segment)
                        .map(|child| (child, &segments[i + 1..]))
                })
                .unwrap_or((self, segments))),
            PathPolicy::Strict => match segments.split_first() {
                Some(_) if self.kind == Kind::Collection => Ok((self, segments)),
                Some((first, rest)) => self
                    .children
                    .get(*first)
                    .map(|child| (child, rest))
                    .ok_or_else(|| ReflexError::unresolved_path(path, *first)),
                None => Ok((self, segments)),
            },
        }
    }

    /// Every path addressable below this node, depth-first in declaration
    /// order. The node itself is not included.
    pub fn paths(&self, delimiter: char) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect_paths(&mut prefix, delimiter, &mut out);
        out
    }

    fn collect_paths(
        &self,
        prefix: &mut Vec<&'static str>,
        delimiter: char,
        out: &mut Vec<String>,
    ) {
        for child in self.children.values() {
            prefix.push(child.name);
            out.push(join_path(prefix.as_slice(), delimiter));
            child.collect_paths(prefix, delimiter, out);
            prefix.pop();
        }
    }

    /// Serialisable snapshot of this subtree.
    pub fn outline(&self) -> Outline {
        Outline {
            name: self.name.to_string(),
            kind: self.kind,
            type_name: self.shape.type_name().to_string(),
            children: self.children.values().map(Node::outline).collect(),
        }
    }
}

/// Serialisable snapshot of a node tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub name: String,
    pub kind: Kind,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Outline>,
}
