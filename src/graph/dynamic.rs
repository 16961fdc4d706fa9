//! The graph type: node weights plus connectivity.

use core::cmp::Ordering;
use core::fmt;
use core::ops::Range;

use tracing::debug;

use super::connectivity::{Connectivity, EdgeInit, JoinPoint};
use super::edge::EdgeIndex;
use super::flavour::{Directed, DirectedEmbedded, EdgeOf, Flavour, Undirected, UndirectedEmbedded};
use super::nodes::{NodeRef, NodeStorage};
use crate::collections::{Backing, Contiguous};
use crate::error::{GraphError, Result};
use crate::weight::{Independent, WeightPolicy};

/// A dynamic graph.
///
/// - `F` picks directedness and edge layout (see [`Flavour`]).
/// - `NW` and `EW` are the node and edge weight types; `()` means unweighted.
/// - `P` decides how the two stored copies of an edge hold its weight.
/// - `B` picks the partition backing.
/// - `NP` decides how node weights are held; [`Pooled`](crate::weight::Pooled)
///   stores equal node weights once.
///
/// With the default [`Independent`] policies both weight types must be `Clone`.
///
/// Node and edge counts move together: every node has exactly one weight and
/// one partition.
pub struct Graph<F, NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent>
where
    F: Flavour,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    nodes: NodeStorage<NW, NP>,
    edges: Connectivity<F, EW, P, B>,
}

/// Plain undirected graph.
pub type UndirectedGraph<NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Graph<Undirected, NW, EW, P, B, NP>;
/// Undirected graph with complementary indices.
pub type UndirectedEmbeddedGraph<NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Graph<UndirectedEmbedded, NW, EW, P, B, NP>;
/// Plain directed graph.
pub type DirectedGraph<NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Graph<Directed, NW, EW, P, B, NP>;
/// Directed graph storing each edge at both ends.
pub type DirectedEmbeddedGraph<NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Graph<DirectedEmbedded, NW, EW, P, B, NP>;

impl<F, NW, EW, P, B, NP> Graph<F, NW, EW, P, B, NP>
where
    F: Flavour,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: NodeStorage::new(),
            edges: Connectivity::new(),
        }
    }

    /// Builds a graph from one list of edge entries per node, with default node weights.
    pub fn from_edges<I, R, E>(partitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = E>,
        E: Into<EdgeInit<EW>>,
        NW: Default,
        EW: PartialEq,
    {
        let edges = Connectivity::from_init(collect_inits(partitions))?;
        let nodes = (0..edges.order()).map(|_| NW::default()).collect();
        debug!(order = edges.order(), size = edges.size(), "built graph from edges");
        Ok(Self { nodes, edges })
    }

    /// Builds a graph from edge entries plus one weight per node.
    ///
    /// The number of weights must equal the number of partitions.
    pub fn from_edges_and_weights<I, R, E, N>(partitions: I, node_weights: N) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = E>,
        E: Into<EdgeInit<EW>>,
        N: IntoIterator<Item = NW>,
        EW: PartialEq,
    {
        let inits = collect_inits(partitions);
        let nodes: NodeStorage<NW, NP> = node_weights.into_iter().collect();
        if nodes.len() != inits.len() {
            return Err(GraphError::NodeWeightCount {
                weights: nodes.len(),
                order: inits.len(),
            });
        }
        let edges = Connectivity::from_init(inits)?;
        debug!(order = edges.order(), size = edges.size(), "built graph from edges and weights");
        Ok(Self { nodes, edges })
    }

    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Number of logical edges.
    #[inline]
    pub fn size(&self) -> usize {
        self.edges.size()
    }

    /// The edge storage.
    pub fn connectivity(&self) -> &Connectivity<F, EW, P, B> {
        &self.edges
    }

    /// The node weights.
    pub fn nodes(&self) -> &NodeStorage<NW, NP> {
        &self.nodes
    }

    /// Edges of `node`.
    pub fn edges(&self, node: usize) -> Result<&[EdgeOf<F, EW, P>]> {
        self.edges.edges(node)
    }

    /// The edge at `at`.
    pub fn edge(&self, at: EdgeIndex) -> Result<&EdgeOf<F, EW, P>> {
        self.edges.edge(at)
    }

    /// Weight of `node`.
    pub fn node_weight(&self, node: usize) -> Result<NodeRef<'_, NW, NP>> {
        self.nodes.node_weight(node)
    }

    /// Replaces the weight of `node`.
    pub fn set_node_weight(&mut self, node: usize, weight: NW) -> Result<()> {
        self.nodes.set_node_weight(node, weight)
    }

    /// Applies `f` to the weight of `node`.
    pub fn mutate_node_weight<R>(&mut self, node: usize, f: impl FnOnce(&mut NW) -> R) -> Result<R> {
        self.nodes.mutate_node_weight(node, f)
    }

    /// Appends an isolated node.
    pub fn add_node(&mut self, weight: NW) -> usize {
        self.edges.add_node();
        self.nodes.add_node(weight)
    }

    /// Inserts an isolated node at `pos`; nodes at `pos` and above move up by one.
    pub fn insert_node(&mut self, pos: usize, weight: NW) -> Result<usize> {
        self.edges.insert_node(pos)?;
        self.nodes.insert_node(pos, weight)
    }

    /// Erases `node` and all edges touching it; nodes above it move down by one.
    pub fn erase_node(&mut self, node: usize) -> Result<()> {
        self.edges.erase_node(node)?;
        self.nodes.erase_node(node)
    }

    /// Erases every node in `range`, highest first.
    pub fn erase_nodes(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.order() {
            return Err(GraphError::NodeOutOfRange {
                method: "erase_nodes",
                node: range.end.max(range.start),
                order: self.order(),
            });
        }
        for node in range.rev() {
            self.erase_node(node)?;
        }
        Ok(())
    }

    /// Appends an edge from `from` to `to`.
    pub fn join(&mut self, from: usize, to: usize, weight: EW) -> Result<EdgeIndex> {
        self.edges.join(from, to, weight)
    }

    /// Inserts an edge at explicit positions.
    ///
    /// Accepts a node index (append) or an [`EdgeIndex`] (insert before) for
    /// either end.
    pub fn insert_join(
        &mut self,
        from: impl Into<JoinPoint>,
        to: impl Into<JoinPoint>,
        weight: EW,
    ) -> Result<EdgeIndex> {
        self.edges.insert_join(from.into(), to.into(), weight)
    }

    /// Erases the edge at `at` and its partner.
    pub fn erase_edge(&mut self, at: EdgeIndex) -> Result<()>
    where
        EW: PartialEq,
    {
        self.edges.erase_edge(at)
    }

    /// Replaces the weight of the edge at `at`; its partner follows.
    pub fn set_edge_weight(&mut self, at: EdgeIndex, weight: EW) -> Result<()>
    where
        EW: PartialEq,
    {
        self.edges.set_edge_weight(at, weight)
    }

    /// Applies `f` to the weight of the edge at `at`; its partner follows.
    pub fn mutate_edge_weight<R>(&mut self, at: EdgeIndex, f: impl FnOnce(&mut EW) -> R) -> Result<R>
    where
        EW: PartialEq,
    {
        self.edges.mutate_edge_weight(at, f)
    }

    /// Address of the partner of the edge at `at`.
    pub fn partner(&self, at: EdgeIndex) -> Result<Option<EdgeIndex>>
    where
        EW: PartialEq,
    {
        self.edges.partner(at)
    }

    /// Exchanges nodes `i` and `j`, with their weights and edges.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        self.edges.swap_nodes(i, j)?;
        self.nodes.swap_nodes(i, j)
    }

    /// Exchanges edges `i` and `j` of `node`.
    pub fn swap_edges(&mut self, node: usize, i: usize, j: usize) -> Result<()> {
        self.edges.swap_edges(node, i, j)
    }

    /// Stably sorts the edges of `node` in `range`.
    pub fn sort_edges<C>(&mut self, node: usize, range: Range<usize>, cmp: C) -> Result<()>
    where
        C: FnMut(&EdgeOf<F, EW, P>, &EdgeOf<F, EW, P>) -> Ordering,
    {
        self.edges.sort_edges(node, range, cmp)
    }

    /// Reserves room for `additional` more nodes.
    pub fn reserve_nodes(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.edges.reserve_nodes(additional);
    }

    /// Node weight capacity.
    pub fn node_capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves room for `additional` more edges at `node`.
    pub fn reserve_edges(&mut self, node: usize, additional: usize) -> Result<()> {
        self.edges.reserve_edges(node, additional)
    }

    /// Edge capacity of the backing storage.
    pub fn edges_capacity(&self) -> usize {
        self.edges.edges_capacity()
    }

    /// Releases unused capacity.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        self.edges.shrink_to_fit();
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Edge entries that rebuild this graph through [`Graph::from_edges_and_weights`].
    pub fn to_init(&self) -> Vec<Vec<EdgeInit<EW>>>
    where
        EW: Clone,
    {
        self.edges.to_init()
    }
}

fn collect_inits<W, I, R, E>(partitions: I) -> Vec<Vec<EdgeInit<W>>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = E>,
    E: Into<EdgeInit<W>>,
{
    partitions
        .into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

impl<F, NW, EW, P, B, NP> Default for Graph<F, NW, EW, P, B, NP>
where
    F: Flavour,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, NW, EW, P, B, NP> Clone for Graph<F, NW, EW, P, B, NP>
where
    F: Flavour,
    NW: Clone,
    EW: Clone,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<F, NW, EW, P, B, NP> PartialEq for Graph<F, NW, EW, P, B, NP>
where
    F: Flavour,
    NW: PartialEq,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
    EdgeOf<F, EW, P>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl<F, NW, EW, P, B, NP> fmt::Debug for Graph<F, NW, EW, P, B, NP>
where
    F: Flavour,
    NW: fmt::Debug,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
    EdgeOf<F, EW, P>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("flavour", &F::KIND)
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .finish()
    }
}
