//! Edge representations.
//!
//! Three layouts cover the four graph flavours:
//!
//! | type                    | stores                                   | used by                 |
//! |-------------------------|------------------------------------------|-------------------------|
//! | [`PartialEdge`]         | target, weight                           | undirected, directed    |
//! | [`EmbeddedPartialEdge`] | target, complementary index, weight      | undirected embedded     |
//! | [`EmbeddedEdge`]        | endpoints, complementary index, weight   | directed embedded       |
//!
//! The *complementary index* is the local position of the partner edge inside
//! the partner node's partition, so the partner is reachable in O(1).

use serde::{Deserialize, Serialize};

use crate::weight::WeightHandle;

/// Address of an edge: owning node and position within that node's partition.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeIndex {
    /// Node whose partition holds the edge.
    pub node: usize,
    /// Local position within the partition.
    pub local: usize,
}

impl EdgeIndex {
    /// Creates an edge address.
    pub const fn new(node: usize, local: usize) -> Self {
        Self { node, local }
    }
}

/// Source and target of a directed embedded edge.
///
/// A self-loop is stored twice in its node's partition; one copy is
/// [`Inverted`](Endpoints::Inverted), storing the node once. Its source and
/// target alias the same index, so moving one moves the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoints {
    /// Ordinary edge.
    Forward {
        /// Tail of the edge.
        source: usize,
        /// Head of the edge.
        target: usize,
    },
    /// Inverted copy of a self-loop.
    Inverted {
        /// The loop's node.
        node: usize,
    },
}

impl Endpoints {
    /// Logical source.
    #[inline]
    pub const fn source(&self) -> usize {
        match *self {
            Self::Forward { source, .. } => source,
            Self::Inverted { node } => node,
        }
    }

    /// Logical target.
    #[inline]
    pub const fn target(&self) -> usize {
        match *self {
            Self::Forward { target, .. } => target,
            Self::Inverted { node } => node,
        }
    }

    /// Returns `true` for the inverted copy of a loop.
    #[inline]
    pub const fn is_inverted(&self) -> bool {
        matches!(self, Self::Inverted { .. })
    }

    /// Moves the source; for an inverted loop this moves the target too.
    pub fn set_source(&mut self, node: usize) {
        match self {
            Self::Forward { source, .. } => *source = node,
            Self::Inverted { node: n } => *n = node,
        }
    }

    /// Moves the target; for an inverted loop this moves the source too.
    pub fn set_target(&mut self, node: usize) {
        match self {
            Self::Forward { target, .. } => *target = node,
            Self::Inverted { node: n } => *n = node,
        }
    }
}

/// Read-only view of an edge's topology, independent of its layout.
pub trait EdgeView {
    /// Node the edge points at.
    fn target_node(&self) -> usize;

    /// Tail of the edge, for layouts that record it.
    fn source_node(&self) -> Option<usize> {
        None
    }

    /// Local position of the partner edge, for embedded layouts.
    fn complementary_index(&self) -> Option<usize> {
        None
    }

    /// Whether this is the inverted copy of a directed loop.
    fn inverted(&self) -> bool {
        false
    }
}

/// Everything needed to build an edge of any layout.
///
/// Layouts ignore the fields they do not store.
#[derive(Debug, Clone, Copy)]
pub struct EdgeParts<H> {
    /// Tail of the edge.
    pub source: usize,
    /// Head of the edge.
    pub target: usize,
    /// Local position of the partner edge.
    pub complementary: usize,
    /// Store as the inverted copy of a loop.
    pub inverted: bool,
    /// Weight handle.
    pub weight: H,
}

/// Construction and in-place update of stored edges.
///
/// Used by the connectivity layer; node and complementary indices are kept
/// consistent there, so these setters do no validation.
pub trait GraphEdge: EdgeView + Sized {
    /// Weight handle type.
    type Handle;

    /// Builds an edge from its parts.
    fn from_parts(parts: EdgeParts<Self::Handle>) -> Self;

    /// Same topology with a different weight handle.
    fn rebuild(&self, weight: Self::Handle) -> Self;

    /// The weight handle.
    fn weight_handle(&self) -> &Self::Handle;

    /// The weight handle, mutably.
    fn weight_handle_mut(&mut self) -> &mut Self::Handle;

    /// Moves the target.
    fn set_target_node(&mut self, node: usize);

    /// Moves the source, if recorded.
    fn set_source_node(&mut self, _node: usize) {}

    /// Updates the complementary index, if recorded.
    fn set_complementary_index(&mut self, _index: usize) {}

    /// Renames every node index the edge stores.
    fn relabel(&mut self, f: impl Fn(usize) -> usize) {
        let target = self.target_node();
        let source = self.source_node();
        self.set_target_node(f(target));
        if let Some(source) = source {
            self.set_source_node(f(source));
        }
    }
}

/// Edge storing a target and a weight.
#[derive(Debug)]
pub struct PartialEdge<H> {
    target: usize,
    weight: H,
}

impl<H> PartialEdge<H> {
    /// Node the edge points at.
    #[inline]
    pub fn target_node(&self) -> usize {
        self.target
    }
}

impl<H: WeightHandle> PartialEdge<H> {
    /// Current weight.
    pub fn weight(&self) -> H::Ref<'_> {
        self.weight.get()
    }
}

impl<H> EdgeView for PartialEdge<H> {
    #[inline]
    fn target_node(&self) -> usize {
        self.target
    }
}

impl<H> GraphEdge for PartialEdge<H> {
    type Handle = H;

    fn from_parts(parts: EdgeParts<H>) -> Self {
        Self {
            target: parts.target,
            weight: parts.weight,
        }
    }

    fn rebuild(&self, weight: H) -> Self {
        Self {
            target: self.target,
            weight,
        }
    }

    fn weight_handle(&self) -> &H {
        &self.weight
    }

    fn weight_handle_mut(&mut self) -> &mut H {
        &mut self.weight
    }

    fn set_target_node(&mut self, node: usize) {
        self.target = node;
    }
}

impl<H: WeightHandle> PartialEq for PartialEdge<H>
where
    H::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && *self.weight.get() == *other.weight.get()
    }
}

/// Undirected edge that knows where its partner lives.
#[derive(Debug)]
pub struct EmbeddedPartialEdge<H> {
    target: usize,
    complementary: usize,
    weight: H,
}

impl<H> EmbeddedPartialEdge<H> {
    /// Node the edge points at.
    #[inline]
    pub fn target_node(&self) -> usize {
        self.target
    }

    /// Position of the partner edge within the target's partition.
    #[inline]
    pub fn complementary_index(&self) -> usize {
        self.complementary
    }
}

impl<H: WeightHandle> EmbeddedPartialEdge<H> {
    /// Current weight.
    pub fn weight(&self) -> H::Ref<'_> {
        self.weight.get()
    }
}

impl<H> EdgeView for EmbeddedPartialEdge<H> {
    #[inline]
    fn target_node(&self) -> usize {
        self.target
    }

    #[inline]
    fn complementary_index(&self) -> Option<usize> {
        Some(self.complementary)
    }
}

impl<H> GraphEdge for EmbeddedPartialEdge<H> {
    type Handle = H;

    fn from_parts(parts: EdgeParts<H>) -> Self {
        Self {
            target: parts.target,
            complementary: parts.complementary,
            weight: parts.weight,
        }
    }

    fn rebuild(&self, weight: H) -> Self {
        Self {
            target: self.target,
            complementary: self.complementary,
            weight,
        }
    }

    fn weight_handle(&self) -> &H {
        &self.weight
    }

    fn weight_handle_mut(&mut self) -> &mut H {
        &mut self.weight
    }

    fn set_target_node(&mut self, node: usize) {
        self.target = node;
    }

    fn set_complementary_index(&mut self, index: usize) {
        self.complementary = index;
    }
}

impl<H: WeightHandle> PartialEq for EmbeddedPartialEdge<H>
where
    H::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.complementary == other.complementary
            && *self.weight.get() == *other.weight.get()
    }
}

/// Directed edge stored in both its source's and its target's partition.
#[derive(Debug)]
pub struct EmbeddedEdge<H> {
    ends: Endpoints,
    complementary: usize,
    weight: H,
}

impl<H> EmbeddedEdge<H> {
    /// Tail of the edge.
    #[inline]
    pub fn source_node(&self) -> usize {
        self.ends.source()
    }

    /// Head of the edge.
    #[inline]
    pub fn target_node(&self) -> usize {
        self.ends.target()
    }

    /// Position of the partner copy within the other endpoint's partition.
    #[inline]
    pub fn complementary_index(&self) -> usize {
        self.complementary
    }

    /// Raw endpoint representation.
    #[inline]
    pub fn endpoints(&self) -> Endpoints {
        self.ends
    }

    /// Whether this is the inverted copy of a loop.
    #[inline]
    pub fn inverted(&self) -> bool {
        self.ends.is_inverted()
    }
}

impl<H: WeightHandle> EmbeddedEdge<H> {
    /// Current weight.
    pub fn weight(&self) -> H::Ref<'_> {
        self.weight.get()
    }
}

impl<H> EdgeView for EmbeddedEdge<H> {
    #[inline]
    fn target_node(&self) -> usize {
        self.ends.target()
    }

    #[inline]
    fn source_node(&self) -> Option<usize> {
        Some(self.ends.source())
    }

    #[inline]
    fn complementary_index(&self) -> Option<usize> {
        Some(self.complementary)
    }

    #[inline]
    fn inverted(&self) -> bool {
        self.ends.is_inverted()
    }
}

impl<H> GraphEdge for EmbeddedEdge<H> {
    type Handle = H;

    fn from_parts(parts: EdgeParts<H>) -> Self {
        let ends = if parts.inverted {
            Endpoints::Inverted { node: parts.target }
        } else {
            Endpoints::Forward {
                source: parts.source,
                target: parts.target,
            }
        };
        Self {
            ends,
            complementary: parts.complementary,
            weight: parts.weight,
        }
    }

    fn rebuild(&self, weight: H) -> Self {
        Self {
            ends: self.ends,
            complementary: self.complementary,
            weight,
        }
    }

    fn weight_handle(&self) -> &H {
        &self.weight
    }

    fn weight_handle_mut(&mut self) -> &mut H {
        &mut self.weight
    }

    fn set_target_node(&mut self, node: usize) {
        self.ends.set_target(node);
    }

    fn set_source_node(&mut self, node: usize) {
        self.ends.set_source(node);
    }

    fn set_complementary_index(&mut self, index: usize) {
        self.complementary = index;
    }
}

impl<H: WeightHandle> PartialEq for EmbeddedEdge<H>
where
    H::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.source_node() == other.source_node()
            && self.target_node() == other.target_node()
            && self.complementary == other.complementary
            && self.inverted() == other.inverted()
            && *self.weight.get() == *other.weight.get()
    }
}

/// Node at the other end of `edge` when seen from `host`.
///
/// For loops this is `host` itself.
#[inline]
pub(crate) fn partner_node<E: EdgeView>(edge: &E, host: usize) -> usize {
    let target = edge.target_node();
    if target == host {
        edge.source_node().unwrap_or(host)
    } else {
        target
    }
}
