//! Graphs: node storage, edge storage and traversal.
//!
//! - [`edge`]: the three stored edge layouts and their addressing.
//! - [`flavour`]: markers choosing directedness and layout.
//! - [`nodes`]: index-addressed node weights.
//! - [`connectivity`]: partitioned edge storage with partner maintenance.
//! - [`dynamic`]: [`Graph`], composing the two storages.
//! - [`traversal`]: breadth-first, depth-first and priority-first search.
//! - [`tree`]: forests whose mutations keep every component a tree.

pub mod connectivity;
pub mod dynamic;
pub mod edge;
pub mod flavour;
pub mod nodes;
pub mod traversal;
pub mod tree;

pub use connectivity::{Connectivity, EdgeInit, JoinPoint};
pub use dynamic::{
    DirectedEmbeddedGraph, DirectedGraph, Graph, UndirectedEmbeddedGraph, UndirectedGraph,
};
pub use edge::{
    EdgeIndex, EdgeParts, EdgeView, EmbeddedEdge, EmbeddedPartialEdge, Endpoints, GraphEdge,
    PartialEdge,
};
pub use flavour::{
    Directed, DirectedEmbedded, EdgeOf, Flavour, GraphFlavour, Undirected, UndirectedEmbedded,
};
pub use nodes::{FixedNodeStorage, NodeRef, NodeStorage, Weights};
pub use traversal::{
    Conditions, Disconnected, FnVisitor, Strategy, Traversal, TraversalEvent, TraversalTrace,
    Visitor,
};
pub use tree::{
    Backward, DirectedEmbeddedTree, DirectedTree, Forward, LinkDirection, Subtree, Symmetric, Tree,
    TreeInit, TreeLinkDirection, UndirectedEmbeddedTree, UndirectedTree,
};

use crate::collections::Backing;
use crate::weight::{WeightHandle, WeightPolicy};

/// Read access needed to walk a graph.
pub trait Network {
    /// Stored edge type.
    type Edge: EdgeView;
    /// Node weight type.
    type NodeWeight;
    /// Handle holding each node weight.
    type NodeHandle: WeightHandle<Value = Self::NodeWeight>;
    /// Flavour of the stored edges.
    const FLAVOUR: GraphFlavour;

    /// Number of nodes.
    fn order(&self) -> usize;

    /// Edges of `node`, which must be below [`order`](Network::order).
    fn partition(&self, node: usize) -> &[Self::Edge];

    /// Node weight handles in index order.
    fn node_handles(&self) -> &[Self::NodeHandle];
}

impl<F, NW, EW, P, B, NP> Network for Graph<F, NW, EW, P, B, NP>
where
    F: Flavour,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    type Edge = EdgeOf<F, EW, P>;
    type NodeWeight = NW;
    type NodeHandle = NP::Handle;
    const FLAVOUR: GraphFlavour = F::KIND;

    #[inline]
    fn order(&self) -> usize {
        Graph::order(self)
    }

    #[inline]
    fn partition(&self, node: usize) -> &[Self::Edge] {
        self.connectivity().partition(node)
    }

    #[inline]
    fn node_handles(&self) -> &[NP::Handle] {
        self.nodes().handles()
    }
}
