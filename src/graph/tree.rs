//! Trees and forests on top of [`Graph`].
//!
//! A [`Tree`] only exposes mutations that keep every component a tree:
//! nodes are added below a parent, and removing a node prunes its whole
//! subtree. Each link is stored according to a [`LinkDirection`]:
//!
//! - [`Symmetric`]: parent and child can reach each other. Undirected
//!   flavours store one connection; directed flavours store a pair of edges.
//! - [`Forward`]: one directed edge from parent to child.
//! - [`Backward`]: one directed edge from child to parent.
//!
//! Parents are tracked alongside the graph, so subtrees are known without
//! searching the edges.

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::dynamic::Graph;
use super::edge::{partner_node, EdgeIndex};
use super::flavour::{Directed, DirectedEmbedded, EdgeOf, Flavour, GraphFlavour, Undirected, UndirectedEmbedded};
use super::nodes::{NodeRef, NodeStorage};
use super::Network;
use crate::collections::{Backing, Contiguous};
use crate::error::{GraphError, Result};
use crate::weight::{Independent, WeightHandle, WeightPolicy};

/// Run-time tag for the three link directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeLinkDirection {
    /// Parent and child reach each other.
    Symmetric,
    /// Parent reaches child.
    Forward,
    /// Child reaches parent.
    Backward,
}

/// Compile-time link direction, valid for flavour `F`.
///
/// [`Forward`] and [`Backward`] only make sense for directed flavours.
pub trait LinkDirection<F: Flavour>: Copy + Default + 'static {
    /// Matching run-time tag.
    const KIND: TreeLinkDirection;
}

/// Links usable from both ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symmetric;

/// Links from parent to child.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Forward;

/// Links from child to parent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Backward;

impl<F: Flavour> LinkDirection<F> for Symmetric {
    const KIND: TreeLinkDirection = TreeLinkDirection::Symmetric;
}

impl LinkDirection<Directed> for Forward {
    const KIND: TreeLinkDirection = TreeLinkDirection::Forward;
}

impl LinkDirection<DirectedEmbedded> for Forward {
    const KIND: TreeLinkDirection = TreeLinkDirection::Forward;
}

impl LinkDirection<Directed> for Backward {
    const KIND: TreeLinkDirection = TreeLinkDirection::Backward;
}

impl LinkDirection<DirectedEmbedded> for Backward {
    const KIND: TreeLinkDirection = TreeLinkDirection::Backward;
}

/// Nested description of a tree: a node weight and its subtrees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeInit<W> {
    /// Weight of this node.
    pub node: W,
    /// Subtrees hanging below it, in order.
    #[serde(default)]
    pub children: Vec<TreeInit<W>>,
}

impl<W> TreeInit<W> {
    /// A node without children.
    pub const fn leaf(node: W) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// A node with the given subtrees.
    pub fn with_children(node: W, children: Vec<TreeInit<W>>) -> Self {
        Self { node, children }
    }
}

/// A forest whose links follow `L`.
pub struct Tree<F, L, NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent>
where
    F: Flavour,
    L: LinkDirection<F>,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    graph: Graph<F, NW, EW, P, B, NP>,
    parents: Vec<Option<usize>>,
    _link: PhantomData<L>,
}

/// Directed tree with the given link direction.
pub type DirectedTree<L, NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Tree<Directed, L, NW, EW, P, B, NP>;
/// Directed tree whose links are visible from both ends.
pub type DirectedEmbeddedTree<L, NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Tree<DirectedEmbedded, L, NW, EW, P, B, NP>;
/// Undirected tree.
pub type UndirectedTree<NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Tree<Undirected, Symmetric, NW, EW, P, B, NP>;
/// Undirected tree with complementary indices.
pub type UndirectedEmbeddedTree<NW = (), EW = (), P = Independent, B = Contiguous, NP = Independent> =
    Tree<UndirectedEmbedded, Symmetric, NW, EW, P, B, NP>;

impl<F, L, NW, EW, P, B, NP> Tree<F, L, NW, EW, P, B, NP>
where
    F: Flavour,
    L: LinkDirection<F>,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    /// Creates an empty forest.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            parents: Vec::new(),
            _link: PhantomData,
        }
    }

    /// Builds a tree from a nested description, numbering nodes depth first.
    pub fn from_init(init: TreeInit<NW>) -> Result<Self>
    where
        EW: Default,
    {
        Self::from_forest([init])
    }

    /// Builds a forest, one tree per description, in order.
    pub fn from_forest<I>(forest: I) -> Result<Self>
    where
        I: IntoIterator<Item = TreeInit<NW>>,
        EW: Default,
    {
        let mut tree = Self::new();
        for init in forest {
            let root = tree.add_root(init.node);
            tree.build(root, init.children)?;
        }
        Ok(tree)
    }

    fn build(&mut self, parent: usize, children: Vec<TreeInit<NW>>) -> Result<()>
    where
        EW: Default,
    {
        for child in children {
            let node = self.add_node(parent, child.node)?;
            self.build(node, child.children)?;
        }
        Ok(())
    }

    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.graph.order()
    }

    /// Number of stored edges.
    #[inline]
    pub fn size(&self) -> usize {
        self.graph.size()
    }

    /// `true` when the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.order() == 0
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph<F, NW, EW, P, B, NP> {
        &self.graph
    }

    /// The node weights.
    pub fn nodes(&self) -> &NodeStorage<NW, NP> {
        self.graph.nodes()
    }

    /// Edges of `node`.
    pub fn edges(&self, node: usize) -> Result<&[EdgeOf<F, EW, P>]> {
        self.graph.edges(node)
    }

    /// Parent of `node`, or `None` for a root.
    pub fn parent(&self, node: usize) -> Result<Option<usize>> {
        self.check("parent", node)?;
        Ok(self.parents[node])
    }

    /// Roots of the forest in index order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(node, parent)| parent.is_none().then_some(node))
    }

    /// Children of `node`.
    ///
    /// Children reachable through `node`'s own edges come first, in edge
    /// order; any others follow in index order.
    pub fn children(&self, node: usize) -> Result<Vec<usize>> {
        self.check("children", node)?;
        let mut children = Vec::new();
        for edge in self.graph.edges(node)? {
            let other = partner_node(edge, node);
            if other != node && self.parents[other] == Some(node) && !children.contains(&other) {
                children.push(other);
            }
        }
        for (other, parent) in self.parents.iter().enumerate() {
            if *parent == Some(node) && !children.contains(&other) {
                children.push(other);
            }
        }
        Ok(children)
    }

    /// View of the subtree rooted at `node`.
    pub fn subtree(&self, node: usize) -> Result<Subtree<'_, Self>> {
        self.check("subtree", node)?;
        Ok(Subtree { tree: self, node })
    }

    /// Weight of `node`.
    pub fn node_weight(&self, node: usize) -> Result<NodeRef<'_, NW, NP>> {
        self.graph.node_weight(node)
    }

    /// Replaces the weight of `node`.
    pub fn set_node_weight(&mut self, node: usize, weight: NW) -> Result<()> {
        self.graph.set_node_weight(node, weight)
    }

    /// Applies `f` to the weight of `node`.
    pub fn mutate_node_weight<R>(&mut self, node: usize, f: impl FnOnce(&mut NW) -> R) -> Result<R> {
        self.graph.mutate_node_weight(node, f)
    }

    /// Replaces the weight of the edge at `at`.
    pub fn set_edge_weight(&mut self, at: EdgeIndex, weight: EW) -> Result<()>
    where
        EW: PartialEq,
    {
        self.graph.set_edge_weight(at, weight)
    }

    /// Applies `f` to the weight of the edge at `at`.
    pub fn mutate_edge_weight<R>(&mut self, at: EdgeIndex, f: impl FnOnce(&mut EW) -> R) -> Result<R>
    where
        EW: PartialEq,
    {
        self.graph.mutate_edge_weight(at, f)
    }

    /// Starts a new tree and returns its root.
    pub fn add_root(&mut self, weight: NW) -> usize {
        self.parents.push(None);
        self.graph.add_node(weight)
    }

    /// Appends a node below `parent`.
    ///
    /// In an empty forest the node becomes the first root and `parent` is
    /// ignored.
    pub fn add_node(&mut self, parent: usize, weight: NW) -> Result<usize>
    where
        EW: Default,
    {
        self.insert_node(self.order(), parent, weight)
    }

    /// Inserts a node at `pos` below `parent`.
    ///
    /// `parent` is read with the new node already in place, so a parent at or
    /// above `pos` is named by its shifted index. In an empty forest the node
    /// becomes the first root and `parent` is ignored.
    pub fn insert_node(&mut self, pos: usize, parent: usize, weight: NW) -> Result<usize>
    where
        EW: Default,
    {
        const METHOD: &str = "insert_node";
        let order = self.order();
        if pos > order {
            return Err(GraphError::NodeOutOfRange {
                method: METHOD,
                node: pos,
                order,
            });
        }
        if order == 0 {
            self.graph.insert_node(pos, weight)?;
            self.parents.push(None);
            return Ok(pos);
        }
        if parent > order || parent == pos {
            return Err(GraphError::InvalidParent {
                method: METHOD,
                parent,
                order: order + 1,
            });
        }

        let node = self.graph.insert_node(pos, weight)?;
        for p in self.parents.iter_mut().flatten() {
            if *p >= pos {
                *p += 1;
            }
        }
        self.parents.insert(pos, Some(parent));

        if F::KIND.is_directed() && L::KIND != TreeLinkDirection::Forward {
            self.graph.join(node, parent, EW::default())?;
        }
        if L::KIND != TreeLinkDirection::Backward {
            self.graph.join(parent, node, EW::default())?;
        }
        trace!(node, parent, "inserted tree node");
        Ok(node)
    }

    /// Removes `node` together with every node below it.
    pub fn prune(&mut self, node: usize) -> Result<()> {
        self.check("prune", node)?;
        let order = self.order();

        let mut below: Vec<Vec<usize>> = vec![Vec::new(); order];
        for (child, parent) in self.parents.iter().enumerate() {
            if let Some(parent) = *parent {
                below[parent].push(child);
            }
        }
        let mut doomed = vec![false; order];
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            doomed[n] = true;
            stack.extend(below[n].iter().copied());
        }

        for n in (0..order).rev().filter(|&n| doomed[n]) {
            self.graph.erase_node(n)?;
        }

        let mut shift = 0;
        let remap: Vec<usize> = doomed
            .iter()
            .map(|&gone| {
                let index = if gone { usize::MAX } else { shift };
                if !gone {
                    shift += 1;
                }
                index
            })
            .collect();
        self.parents = self
            .parents
            .iter()
            .zip(&doomed)
            .filter(|(_, &gone)| !gone)
            .map(|(parent, _)| parent.map(|p| remap[p]))
            .collect();

        trace!(node, removed = order - self.order(), "pruned subtree");
        Ok(())
    }

    /// Exchanges nodes `i` and `j`, with their weights, edges and places in the tree.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        self.graph.swap_nodes(i, j)?;
        self.parents.swap(i, j);
        for p in self.parents.iter_mut().flatten() {
            if *p == i {
                *p = j;
            } else if *p == j {
                *p = i;
            }
        }
        Ok(())
    }

    /// Exchanges edges `i` and `j` of `node`.
    pub fn swap_edges(&mut self, node: usize, i: usize, j: usize) -> Result<()> {
        self.graph.swap_edges(node, i, j)
    }

    /// Stably sorts the edges of `node` in `range`.
    pub fn sort_edges<C>(&mut self, node: usize, range: Range<usize>, cmp: C) -> Result<()>
    where
        C: FnMut(&EdgeOf<F, EW, P>, &EdgeOf<F, EW, P>) -> Ordering,
    {
        self.graph.sort_edges(node, range, cmp)
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.parents.clear();
    }

    fn check(&self, method: &'static str, node: usize) -> Result<()> {
        if node < self.order() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                method,
                node,
                order: self.order(),
            })
        }
    }
}

/// A node of a [`Tree`] seen as the root of its subtree.
pub struct Subtree<'t, T> {
    tree: &'t T,
    node: usize,
}

impl<T> Clone for Subtree<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Subtree<'_, T> {}

impl<T> PartialEq for Subtree<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl<T> fmt::Debug for Subtree<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subtree").field("node", &self.node).finish_non_exhaustive()
    }
}

impl<'t, F, L, NW, EW, P, B, NP> Subtree<'t, Tree<F, L, NW, EW, P, B, NP>>
where
    F: Flavour,
    L: LinkDirection<F>,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    /// The tree this view belongs to.
    pub fn tree(&self) -> &'t Tree<F, L, NW, EW, P, B, NP> {
        self.tree
    }

    /// Index of the subtree's root.
    pub fn node(&self) -> usize {
        self.node
    }

    /// Weight of the subtree's root.
    pub fn weight(&self) -> NodeRef<'t, NW, NP> {
        self.tree.nodes().handles()[self.node].get()
    }

    /// Subtrees hanging directly below this one.
    pub fn children(&self) -> Vec<Self> {
        self.tree
            .children(self.node)
            .unwrap_or_default()
            .into_iter()
            .map(|node| Subtree { tree: self.tree, node })
            .collect()
    }

    /// The enclosing subtree, unless this is a root.
    pub fn parent(&self) -> Option<Self> {
        self.tree.parents[self.node].map(|node| Subtree { tree: self.tree, node })
    }
}

impl<F, L, NW, EW, P, B, NP> Default for Tree<F, L, NW, EW, P, B, NP>
where
    F: Flavour,
    L: LinkDirection<F>,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, L, NW, EW, P, B, NP> Clone for Tree<F, L, NW, EW, P, B, NP>
where
    F: Flavour,
    L: LinkDirection<F>,
    NW: Clone,
    EW: Clone,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
{
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            parents: self.parents.clone(),
            _link: PhantomData,
        }
    }
}

impl<F, L, NW, EW, P, B, NP> PartialEq for Tree<F, L, NW, EW, P, B, NP>
where
    F: Flavour,
    L: LinkDirection<F>,
    NW: PartialEq,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
    EdgeOf<F, EW, P>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.parents == other.parents && self.graph == other.graph
    }
}

impl<F, L, NW, EW, P, B, NP> fmt::Debug for Tree<F, L, NW, EW, P, B, NP>
where
    F: Flavour,
    L: LinkDirection<F>,
    NW: fmt::Debug,
    P: WeightPolicy<EW>,
    B: Backing,
    NP: WeightPolicy<NW>,
    EdgeOf<F, EW, P>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("links", &L::KIND)
            .field("parents", &self.parents)
            .field("graph", &self.graph)
            .finish()
    }
}

impl<F, L, NW, EW, P, B, NP> Network for Tree<F, L, NW, EW, P, B, NP>
where
    F: Flavour,
    L: LinkDirection<F>,
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
        self.graph.order()
    }

    #[inline]
    fn partition(&self, node: usize) -> &[Self::Edge] {
        Network::partition(&self.graph, node)
    }

    #[inline]
    fn node_handles(&self) -> &[NP::Handle] {
        self.graph.nodes().handles()
    }
}
