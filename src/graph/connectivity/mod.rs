//! Edge storage: one partition of edges per node.
//!
//! `Connectivity` owns the edges of a graph and keeps their cross references
//! consistent under mutation:
//!
//! - target (and source) node indices shift when nodes are inserted, erased or
//!   swapped;
//! - in embedded flavours, complementary indices are repaired by a single
//!   reindex pass after every structural change (see `reindex`);
//! - in undirected and embedded flavours every edge has exactly one partner,
//!   and writes to one side's weight reach the other.
//!
//! All indices are range checked; failures are reported as [`GraphError`].

mod init;
mod reindex;

pub use init::EdgeInit;

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Range;
use std::collections::HashMap;

use tracing::trace;

use self::reindex::{permute_in_place, Relocation};
use super::edge::{partner_node, EdgeIndex, EdgeParts, EdgeView, GraphEdge};
use super::flavour::{EdgeOf, Flavour, GraphFlavour};
use crate::collections::{Backing, PartitionedStorage};
use crate::error::{GraphError, Result};
use crate::weight::{WeightHandle, WeightPolicy};

/// Where [`Connectivity::insert_join`] places a new edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinPoint {
    /// After the last edge of the node.
    End(usize),
    /// Before the addressed edge; `local` may equal the partition length.
    At(EdgeIndex),
}

impl JoinPoint {
    /// Node whose partition receives the edge.
    pub const fn node(self) -> usize {
        match self {
            Self::End(node) => node,
            Self::At(at) => at.node,
        }
    }
}

impl From<usize> for JoinPoint {
    fn from(node: usize) -> Self {
        Self::End(node)
    }
}

impl From<EdgeIndex> for JoinPoint {
    fn from(at: EdgeIndex) -> Self {
        Self::At(at)
    }
}

/// Partitioned edge storage for one graph flavour.
pub struct Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
{
    edges: B::Storage<EdgeOf<F, W, P>>,
    policy: P,
    _marker: PhantomData<(F, fn() -> W)>,
}

impl<F, W, P, B> Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
{
    /// Creates connectivity with no nodes.
    pub fn new() -> Self {
        Self {
            edges: Default::default(),
            policy: P::default(),
            _marker: PhantomData,
        }
    }

    /// Number of partitions, i.e. the graph order.
    #[inline]
    pub fn order(&self) -> usize {
        self.edges.num_partitions()
    }

    /// Number of logical edges.
    ///
    /// Flavours that store each connection twice count it once.
    pub fn size(&self) -> usize {
        let stored = self.edges.len();
        if F::KIND.has_partners() {
            stored / 2
        } else {
            stored
        }
    }

    /// The weight policy, e.g. to inspect a pool.
    pub fn weight_policy(&self) -> &P {
        &self.policy
    }

    fn check_node(&self, method: &'static str, node: usize) -> Result<()> {
        let order = self.order();
        if node < order {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                method,
                node,
                order,
            })
        }
    }

    fn check_edge(&self, method: &'static str, at: EdgeIndex) -> Result<()> {
        self.check_node(method, at.node)?;
        let len = self.edges.partition(at.node).len();
        if at.local < len {
            Ok(())
        } else {
            Err(GraphError::EdgeOutOfRange {
                method,
                node: at.node,
                edge: at.local,
                len,
            })
        }
    }

    /// Edges stored in `node`'s partition.
    pub fn edges(&self, node: usize) -> Result<&[EdgeOf<F, W, P>]> {
        self.check_node("edges", node)?;
        Ok(self.edges.partition(node))
    }

    /// Partition of a node already known to be in range.
    #[inline]
    pub(crate) fn partition(&self, node: usize) -> &[EdgeOf<F, W, P>] {
        self.edges.partition(node)
    }

    /// The edge at `at`.
    pub fn edge(&self, at: EdgeIndex) -> Result<&EdgeOf<F, W, P>> {
        self.check_edge("edge", at)?;
        Ok(&self.edges.partition(at.node)[at.local])
    }

    fn build(
        source: usize,
        target: usize,
        complementary: usize,
        inverted: bool,
        weight: P::Handle,
    ) -> EdgeOf<F, W, P> {
        <EdgeOf<F, W, P> as GraphEdge>::from_parts(EdgeParts {
            source,
            target,
            complementary,
            inverted,
            weight,
        })
    }

    fn relabel_all(&mut self, f: impl Fn(usize) -> usize) {
        for node in 0..self.order() {
            for edge in self.edges.partition_mut(node) {
                edge.relabel(&f);
            }
        }
    }

    /// Appends an isolated node.
    pub fn add_node(&mut self) -> usize {
        self.edges.push_partition();
        self.order() - 1
    }

    /// Inserts an isolated node at `pos`, shifting nodes `>= pos` up by one.
    pub fn insert_node(&mut self, pos: usize) -> Result<usize> {
        let order = self.order();
        if pos > order {
            return Err(GraphError::NodeOutOfRange {
                method: "insert_node",
                node: pos,
                order,
            });
        }
        self.edges.insert_partition(pos);
        self.relabel_all(|n| if n >= pos { n + 1 } else { n });
        trace!(node = pos, "inserted node");
        Ok(pos)
    }

    /// Erases `node` and every edge incident on it, shifting nodes above it down.
    pub fn erase_node(&mut self, node: usize) -> Result<()> {
        const METHOD: &str = "erase_node";
        self.check_node(METHOD, node)?;

        for host in 0..self.order() {
            if host == node {
                continue;
            }
            let doomed: Vec<usize> = self
                .edges
                .partition(host)
                .iter()
                .enumerate()
                .filter(|(_, edge)| partner_node(*edge, host) == node)
                .map(|(local, _)| local)
                .collect();
            if doomed.is_empty() {
                continue;
            }

            let mut relocation = Relocation::identity(host, self.edges.partition(host).len());
            for &local in doomed.iter().rev() {
                self.edges.erase_from_partition(host, local);
                relocation.erase(local);
            }
            self.reindex(METHOD, &[relocation])?;
        }

        self.edges.erase_partition(node);
        self.relabel_all(|n| if n > node { n - 1 } else { n });
        trace!(node, "erased node");
        Ok(())
    }

    fn resolve(&self, method: &'static str, point: JoinPoint) -> Result<(usize, usize)> {
        let node = point.node();
        self.check_node(method, node)?;
        let len = self.edges.partition(node).len();
        match point {
            JoinPoint::End(_) => Ok((node, len)),
            JoinPoint::At(at) if at.local <= len => Ok((node, at.local)),
            JoinPoint::At(at) => Err(GraphError::InsertionOutOfRange {
                method,
                node,
                position: at.local,
                len,
            }),
        }
    }

    /// Connects `from` to `to`, returning the address of the edge stored at `from`.
    ///
    /// Plain directed graphs store a single edge in `from`'s partition and only
    /// use the node of `to`. Every other flavour also stores a partner at `to`.
    /// For a self-loop both positions are resolved against the partition as it
    /// was before either edge is inserted.
    pub fn insert_join(&mut self, from: JoinPoint, to: JoinPoint, weight: W) -> Result<EdgeIndex> {
        const METHOD: &str = "insert_join";
        let (u, pu) = self.resolve(METHOD, from)?;

        if !F::KIND.has_partners() {
            let v = to.node();
            self.check_node(METHOD, v)?;
            let handle = self.policy.make(weight);
            self.edges
                .insert_to_partition(u, pu, Self::build(u, v, 0, false, handle));
            trace!(from = u, to = v, position = pu, "inserted edge");
            return Ok(EdgeIndex::new(u, pu));
        }

        let (v, pv) = self.resolve(METHOD, to)?;
        let leader = self.policy.make(weight);
        let follower = self.policy.share(&leader);
        // undirected partners point back; directed copies keep the same endpoints
        let (back_source, back_target) = if F::KIND.is_directed() {
            (u, v)
        } else {
            (v, u)
        };

        let placed = if u == v {
            let second = pv;
            let first = if pv <= pu { pu + 1 } else { pu };
            let directed = F::KIND.is_directed();
            let mut relocation = Relocation::identity(u, self.edges.partition(u).len());

            self.edges.insert_to_partition(
                u,
                pu,
                Self::build(u, v, second, directed && first > second, leader),
            );
            relocation.insert(pu);
            self.edges.insert_to_partition(
                u,
                pv,
                Self::build(back_source, back_target, first, directed && second > first, follower),
            );
            relocation.insert(pv);

            self.reindex(METHOD, &[relocation])?;
            EdgeIndex::new(u, first)
        } else {
            let mut at_u = Relocation::identity(u, self.edges.partition(u).len());
            let mut at_v = Relocation::identity(v, self.edges.partition(v).len());

            self.edges
                .insert_to_partition(u, pu, Self::build(u, v, pv, false, leader));
            at_u.insert(pu);
            self.edges.insert_to_partition(
                v,
                pv,
                Self::build(back_source, back_target, pu, false, follower),
            );
            at_v.insert(pv);

            self.reindex(METHOD, &[at_u, at_v])?;
            EdgeIndex::new(u, pu)
        };

        trace!(from = u, to = v, position = placed.local, "inserted edge pair");
        Ok(placed)
    }

    /// Appends a connection from `from` to `to`.
    pub fn join(&mut self, from: usize, to: usize, weight: W) -> Result<EdgeIndex> {
        self.insert_join(JoinPoint::End(from), JoinPoint::End(to), weight)
    }

    fn locate_partner(&self, method: &'static str, at: EdgeIndex) -> Result<Option<EdgeIndex>>
    where
        W: PartialEq,
    {
        let edge = &self.edges.partition(at.node)[at.local];
        let other = partner_node(edge, at.node);
        let missing = || GraphError::Invariant {
            method,
            detail: format!("no partner found for edge {} of node {}", at.local, at.node),
        };

        match F::KIND {
            GraphFlavour::Directed => Ok(None),
            GraphFlavour::Undirected => {
                let key = P::alias_key(edge.weight_handle());
                self.edges
                    .partition(other)
                    .iter()
                    .enumerate()
                    .find(|&(local, candidate)| {
                        (other != at.node || local != at.local)
                            && candidate.target_node() == at.node
                            && match key {
                                Some(key) => P::alias_key(candidate.weight_handle()) == Some(key),
                                None => *candidate.weight_handle().get() == *edge.weight_handle().get(),
                            }
                    })
                    .map(|(local, _)| Some(EdgeIndex::new(other, local)))
                    .ok_or_else(missing)
            }
            GraphFlavour::UndirectedEmbedded | GraphFlavour::DirectedEmbedded => {
                let comp = edge.complementary_index().ok_or_else(missing)?;
                let partner = self.edges.partition(other).get(comp).ok_or_else(missing)?;
                if partner_node(partner, other) != at.node
                    || partner.complementary_index() != Some(at.local)
                {
                    return Err(missing());
                }
                Ok(Some(EdgeIndex::new(other, comp)))
            }
        }
    }

    /// Address of the partner of the edge at `at`; `None` for plain directed edges.
    pub fn partner(&self, at: EdgeIndex) -> Result<Option<EdgeIndex>>
    where
        W: PartialEq,
    {
        self.check_edge("partner", at)?;
        self.locate_partner("partner", at)
    }

    /// Erases the edge at `at` together with its partner.
    pub fn erase_edge(&mut self, at: EdgeIndex) -> Result<()>
    where
        W: PartialEq,
    {
        const METHOD: &str = "erase_edge";
        self.check_edge(METHOD, at)?;

        let Some(partner) = self.locate_partner(METHOD, at)? else {
            self.edges.erase_from_partition(at.node, at.local);
            trace!(node = at.node, local = at.local, "erased edge");
            return Ok(());
        };

        if partner.node == at.node {
            let (high, low) = if partner.local > at.local {
                (partner.local, at.local)
            } else {
                (at.local, partner.local)
            };
            let mut relocation = Relocation::identity(at.node, self.edges.partition(at.node).len());
            self.edges.erase_from_partition(at.node, high);
            relocation.erase(high);
            self.edges.erase_from_partition(at.node, low);
            relocation.erase(low);
            self.reindex(METHOD, &[relocation])?;
        } else {
            let mut here = Relocation::identity(at.node, self.edges.partition(at.node).len());
            let mut there =
                Relocation::identity(partner.node, self.edges.partition(partner.node).len());
            self.edges.erase_from_partition(at.node, at.local);
            here.erase(at.local);
            self.edges.erase_from_partition(partner.node, partner.local);
            there.erase(partner.local);
            self.reindex(METHOD, &[here, there])?;
        }

        trace!(node = at.node, local = at.local, "erased edge pair");
        Ok(())
    }

    fn copy_weight(&mut self, from: EdgeIndex, to: EdgeIndex) {
        let handle = self
            .policy
            .share(self.edges.partition(from.node)[from.local].weight_handle());
        *self.edges.partition_mut(to.node)[to.local].weight_handle_mut() = handle;
    }

    /// Replaces the weight of the edge at `at` and of its partner.
    pub fn set_edge_weight(&mut self, at: EdgeIndex, weight: W) -> Result<()>
    where
        W: PartialEq,
    {
        const METHOD: &str = "set_edge_weight";
        self.check_edge(METHOD, at)?;
        let partner = if P::SHARES_STORAGE {
            None
        } else {
            self.locate_partner(METHOD, at)?
        };

        let edge = &mut self.edges.partition_mut(at.node)[at.local];
        self.policy.set(edge.weight_handle_mut(), weight);
        if let Some(partner) = partner {
            self.copy_weight(at, partner);
        }
        Ok(())
    }

    /// Applies `f` to the weight of the edge at `at`; the partner sees the result.
    pub fn mutate_edge_weight<R>(&mut self, at: EdgeIndex, f: impl FnOnce(&mut W) -> R) -> Result<R>
    where
        W: PartialEq,
    {
        const METHOD: &str = "mutate_edge_weight";
        self.check_edge(METHOD, at)?;
        let partner = if P::SHARES_STORAGE {
            None
        } else {
            self.locate_partner(METHOD, at)?
        };

        let edge = &mut self.edges.partition_mut(at.node)[at.local];
        let out = self.policy.mutate(edge.weight_handle_mut(), f);
        if let Some(partner) = partner {
            self.copy_weight(at, partner);
        }
        Ok(out)
    }

    /// Exchanges the labels of nodes `i` and `j`.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        const METHOD: &str = "swap_nodes";
        self.check_node(METHOD, i)?;
        self.check_node(METHOD, j)?;
        if i == j {
            return Ok(());
        }
        self.relabel_all(|n| {
            if n == i {
                j
            } else if n == j {
                i
            } else {
                n
            }
        });
        self.edges.swap_partitions(i, j);
        trace!(i, j, "swapped nodes");
        Ok(())
    }

    /// Exchanges two edges within `node`'s partition.
    pub fn swap_edges(&mut self, node: usize, i: usize, j: usize) -> Result<()> {
        const METHOD: &str = "swap_edges";
        self.check_edge(METHOD, EdgeIndex::new(node, i))?;
        self.check_edge(METHOD, EdgeIndex::new(node, j))?;
        if i == j {
            return Ok(());
        }
        let mut relocation = Relocation::identity(node, self.edges.partition(node).len());
        self.edges.partition_mut(node).swap(i, j);
        relocation.swap(i, j);
        self.reindex(METHOD, &[relocation])?;
        trace!(node, i, j, "swapped edges");
        Ok(())
    }

    /// Stably sorts the edges of `node` in `range` using `cmp`.
    pub fn sort_edges<C>(&mut self, node: usize, range: Range<usize>, mut cmp: C) -> Result<()>
    where
        C: FnMut(&EdgeOf<F, W, P>, &EdgeOf<F, W, P>) -> Ordering,
    {
        const METHOD: &str = "sort_edges";
        self.check_node(METHOD, node)?;
        let len = self.edges.partition(node).len();
        if range.start > range.end || range.end > len {
            return Err(GraphError::EdgeOutOfRange {
                method: METHOD,
                node,
                edge: if range.end > len { range.end } else { range.start },
                len,
            });
        }

        let start = range.start;
        let mut sources: Vec<usize> = range.collect();
        {
            let partition = self.edges.partition(node);
            sources.sort_by(|&a, &b| cmp(&partition[a], &partition[b]));
        }

        let mut relocation = Relocation::identity(node, len);
        relocation.permute(start, &sources);
        let relative: Vec<usize> = sources.iter().map(|&s| s - start).collect();
        permute_in_place(
            &mut self.edges.partition_mut(node)[start..start + relative.len()],
            &relative,
        );
        self.reindex(METHOD, &[relocation])?;
        trace!(node, len = relative.len(), "sorted edges");
        Ok(())
    }

    /// Reserves room for `additional` more nodes.
    pub fn reserve_nodes(&mut self, additional: usize) {
        self.edges.reserve_partitions(additional);
    }

    /// Reserves room for `additional` more edges at `node`.
    pub fn reserve_edges(&mut self, node: usize, additional: usize) -> Result<()> {
        self.check_node("reserve_edges", node)?;
        self.edges.reserve_partition(node, additional);
        Ok(())
    }

    /// Total edge capacity of the backing storage.
    pub fn edges_capacity(&self) -> usize {
        self.edges.capacity()
    }

    /// Releases unused capacity.
    pub fn shrink_to_fit(&mut self) {
        self.edges.shrink_to_fit();
    }

    /// Removes every node and edge.
    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

impl<F, W, P, B> Default for Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: pairs in the copy share with each other, never with `self`.
impl<F, W, P, B> Clone for Connectivity<F, W, P, B>
where
    F: Flavour,
    W: Clone,
    P: WeightPolicy<W>,
    B: Backing,
{
    fn clone(&self) -> Self {
        let mut policy = P::default();
        let mut edges: B::Storage<EdgeOf<F, W, P>> = Default::default();
        let mut aliases: HashMap<usize, EdgeIndex> = HashMap::new();

        for node in 0..self.order() {
            edges.push_partition();
            for (local, edge) in self.edges.partition(node).iter().enumerate() {
                let key = P::alias_key(edge.weight_handle());
                let weight = match key.and_then(|k| aliases.get(&k).copied()) {
                    Some(first) => {
                        policy.share(edges.partition(first.node)[first.local].weight_handle())
                    }
                    None => {
                        if let Some(k) = key {
                            aliases.insert(k, EdgeIndex::new(node, local));
                        }
                        policy.duplicate(edge.weight_handle())
                    }
                };
                edges.push_to_partition(node, edge.rebuild(weight));
            }
        }

        Self {
            edges,
            policy,
            _marker: PhantomData,
        }
    }
}

impl<F, W, P, B> PartialEq for Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
    EdgeOf<F, W, P>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.order() == other.order()
            && (0..self.order()).all(|n| self.edges.partition(n) == other.edges.partition(n))
    }
}

impl<F, W, P, B> fmt::Debug for Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
    EdgeOf<F, W, P>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.order()).map(|n| self.edges.partition(n)))
            .finish()
    }
}
