//! Graph search.
//!
//! A [`Traversal`] walks a graph lazily and yields [`TraversalEvent`]s:
//!
//! - `Discovered(n)` once per node, before any of its edges;
//! - `EdgeFirst(e)` the first time a connection is met;
//! - `EdgeSecond(e)` when an undirected connection is met again from its
//!   other end (never under true depth-first search);
//! - `Finished(n)` once all of a node's edges have been handled.
//!
//! Four strategies share this contract:
//!
//! | strategy             | frontier         | edge order within a node |
//! |----------------------|------------------|--------------------------|
//! | breadth-first        | FIFO queue       | forward                  |
//! | depth-first          | stack of frames  | forward, descend eagerly |
//! | pseudo depth-first   | stack of nodes   | reverse                  |
//! | priority-first       | comparator heap  | forward                  |
//!
//! Directed graphs follow outgoing edges only. The graph is borrowed for the
//! lifetime of the traversal, so its connectivity cannot change underneath it.

mod visitor;

pub use visitor::{FnVisitor, TraversalTrace, Visitor};

use core::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::edge::{EdgeIndex, EdgeView};
use super::flavour::GraphFlavour;
use super::Network;
use crate::collections::BinaryHeapBy;
use crate::concurrency::{DispatchError, TaskDispatcher};
use crate::error::{GraphError, Result};
use crate::weight::WeightHandle;

/// What to do with nodes the seed cannot reach.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disconnected {
    /// Restart from the lowest undiscovered node until every node is found.
    #[default]
    Find,
    /// Stop once the seed's component is exhausted.
    Ignore,
}

/// Where a traversal starts and whether it leaves the seed's component.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Conditions {
    /// Disconnected component policy.
    pub disconnected: Disconnected,
    /// First node to expand.
    pub seed: usize,
}

impl Conditions {
    /// Visit every node, starting from node 0.
    pub const fn find_disconnected() -> Self {
        Self {
            disconnected: Disconnected::Find,
            seed: 0,
        }
    }

    /// Visit only the component containing `seed`.
    pub const fn ignore_disconnected(seed: usize) -> Self {
        Self {
            disconnected: Disconnected::Ignore,
            seed,
        }
    }

    /// Same policy, different seed.
    #[must_use]
    pub const fn starting_at(self, seed: usize) -> Self {
        Self { seed, ..self }
    }
}

/// Search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Layer by layer.
    BreadthFirst,
    /// True depth-first search.
    DepthFirst,
    /// Stack based search expanding each node's edges in reverse.
    PseudoDepthFirst,
    /// Highest priority node first; ties go to the earliest queued.
    PriorityFirst,
}

/// One step of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraversalEvent {
    /// A node was reached.
    Discovered(usize),
    /// A connection was met for the first time.
    EdgeFirst(EdgeIndex),
    /// A connection was met again from its other end.
    EdgeSecond(EdgeIndex),
    /// A node's edges are exhausted.
    Finished(usize),
}

type HeapOrder<'g> = Box<dyn Fn(&(usize, u64), &(usize, u64)) -> Ordering + 'g>;

/// Depth-first stack frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next: usize,
    /// Parent whose first back edge is the tree edge (plain undirected).
    parent: Option<usize>,
    /// Local index of the tree edge's partner copy (undirected embedded).
    tree_partner: Option<usize>,
    /// Plain undirected loops are stored twice; toggles between the copies.
    loop_open: bool,
}

impl Frame {
    const fn root(node: usize) -> Self {
        Self {
            node,
            next: 0,
            parent: None,
            tree_partner: None,
            loop_open: false,
        }
    }
}

enum Frontier<'g> {
    Queue(VecDeque<usize>),
    Stack(Vec<usize>),
    Heap(BinaryHeapBy<(usize, u64), HeapOrder<'g>>, u64),
    Frames(Vec<Frame>),
}

/// A lazy search over a [`Network`].
pub struct Traversal<'g, G: Network> {
    graph: &'g G,
    strategy: Strategy,
    conditions: Conditions,
    frontier: Frontier<'g>,
    discovered: Vec<bool>,
    processed: Vec<bool>,
    pending: VecDeque<TraversalEvent>,
    restart: usize,
}

impl<'g, G: Network> Traversal<'g, G> {
    fn start(graph: &'g G, strategy: Strategy, conditions: Conditions, frontier: Frontier<'g>) -> Result<Self> {
        let order = graph.order();
        if order > 0 && conditions.seed >= order {
            return Err(GraphError::NodeOutOfRange {
                method: "traverse",
                node: conditions.seed,
                order,
            });
        }

        debug!(
            ?strategy,
            seed = conditions.seed,
            disconnected = ?conditions.disconnected,
            order,
            flavour = ?G::FLAVOUR,
            "starting traversal"
        );

        let mut traversal = Self {
            graph,
            strategy,
            conditions,
            frontier,
            discovered: vec![false; order],
            processed: vec![false; order],
            pending: VecDeque::new(),
            restart: 0,
        };
        if order > 0 {
            traversal.push_node(conditions.seed, None);
        }
        Ok(traversal)
    }

    /// Layer-by-layer search.
    pub fn breadth_first(graph: &'g G, conditions: Conditions) -> Result<Self> {
        Self::start(graph, Strategy::BreadthFirst, conditions, Frontier::Queue(VecDeque::new()))
    }

    /// True depth-first search: descends as soon as an undiscovered neighbour
    /// is met and finishes nodes in reverse nesting order.
    pub fn depth_first(graph: &'g G, conditions: Conditions) -> Result<Self> {
        Self::start(graph, Strategy::DepthFirst, conditions, Frontier::Frames(Vec::new()))
    }

    /// Stack search that expands every edge of a node before moving on.
    ///
    /// Edges are walked in reverse so neighbours pop in forward order.
    pub fn pseudo_depth_first(graph: &'g G, conditions: Conditions) -> Result<Self> {
        Self::start(graph, Strategy::PseudoDepthFirst, conditions, Frontier::Stack(Vec::new()))
    }

    /// Priority search visiting the node with the greatest weight first.
    pub fn priority_first(graph: &'g G, conditions: Conditions) -> Result<Self>
    where
        G::NodeWeight: Ord,
    {
        Self::priority_first_by(graph, conditions, Ord::cmp)
    }

    /// Priority search with a custom node weight ordering.
    ///
    /// The node whose weight compares greatest is expanded next; among equal
    /// weights the node queued first wins.
    pub fn priority_first_by<C>(graph: &'g G, conditions: Conditions, cmp: C) -> Result<Self>
    where
        C: Fn(&G::NodeWeight, &G::NodeWeight) -> Ordering + 'g,
    {
        let weights = graph.node_handles();
        let order: HeapOrder<'g> = Box::new(move |a: &(usize, u64), b: &(usize, u64)| {
            cmp(&*weights[a.0].get(), &*weights[b.0].get()).then_with(|| b.1.cmp(&a.1))
        });
        Self::start(
            graph,
            Strategy::PriorityFirst,
            conditions,
            Frontier::Heap(BinaryHeapBy::new(order), 0),
        )
    }

    /// The strategy in use.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The conditions the traversal was started with.
    pub fn conditions(&self) -> Conditions {
        self.conditions
    }

    /// Feeds every remaining event to `visitor`.
    pub fn visit<V: Visitor + ?Sized>(self, visitor: &mut V) {
        for event in self {
            visitor.on_event(event);
        }
    }

    /// Runs to completion and records every event.
    pub fn trace(self) -> TraversalTrace {
        self.collect()
    }

    /// Runs `task` once per event through `dispatcher`.
    ///
    /// Results are in event order whatever the backend.
    pub fn dispatch<D, R, T>(self, dispatcher: &D, task: T) -> core::result::Result<Vec<R>, DispatchError>
    where
        D: TaskDispatcher + ?Sized,
        R: Send,
        T: Fn(TraversalEvent) -> R + Sync,
    {
        dispatcher.run(self, task)
    }

    /// Runs `task` once per discovered node, in discovery order.
    pub fn dispatch_nodes<D, R, T>(self, dispatcher: &D, task: T) -> core::result::Result<Vec<R>, DispatchError>
    where
        D: TaskDispatcher + ?Sized,
        R: Send,
        T: Fn(usize) -> R + Sync,
    {
        let nodes = self.filter_map(|event| match event {
            TraversalEvent::Discovered(node) => Some(node),
            _ => None,
        });
        dispatcher.run(nodes, task)
    }

    /// Runs `task` once per first edge discovery, in discovery order.
    pub fn dispatch_edges<D, R, T>(self, dispatcher: &D, task: T) -> core::result::Result<Vec<R>, DispatchError>
    where
        D: TaskDispatcher + ?Sized,
        R: Send,
        T: Fn(EdgeIndex) -> R + Sync,
    {
        let edges = self.filter_map(|event| match event {
            TraversalEvent::EdgeFirst(edge) => Some(edge),
            _ => None,
        });
        dispatcher.run(edges, task)
    }

    /// Queues an undiscovered node. `via` is the tree edge used to reach it.
    fn push_node(&mut self, node: usize, via: Option<EdgeIndex>) {
        self.discovered[node] = true;
        match &mut self.frontier {
            Frontier::Queue(queue) => queue.push_back(node),
            Frontier::Stack(stack) => stack.push(node),
            Frontier::Heap(heap, seq) => {
                heap.push((node, *seq));
                *seq += 1;
            }
            Frontier::Frames(frames) => {
                let mut frame = Frame::root(node);
                if let Some(via) = via {
                    match G::FLAVOUR {
                        GraphFlavour::Undirected => frame.parent = Some(via.node),
                        GraphFlavour::UndirectedEmbedded => {
                            frame.tree_partner =
                                self.graph.partition(via.node)[via.local].complementary_index();
                        }
                        GraphFlavour::Directed | GraphFlavour::DirectedEmbedded => {}
                    }
                }
                frames.push(frame);
                self.pending.push_back(TraversalEvent::Discovered(node));
            }
        }
    }

    fn pop_node(&mut self) -> Option<usize> {
        match &mut self.frontier {
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Heap(heap, _) => heap.pop().map(|(node, _)| node),
            Frontier::Frames(_) => None,
        }
    }

    /// Whether an edge stored at `node` leads away from it.
    fn is_outgoing(&self, node: usize, edge: &G::Edge) -> bool {
        match G::FLAVOUR {
            GraphFlavour::DirectedEmbedded => !edge.inverted() && edge.source_node() == Some(node),
            _ => true,
        }
    }

    /// Expands one node completely (every strategy but true depth-first).
    fn expand(&mut self, node: usize) {
        let graph = self.graph;
        let edges = graph.partition(node);
        let reverse = self.strategy == Strategy::PseudoDepthFirst;
        let mut loop_open = false;

        self.pending.push_back(TraversalEvent::Discovered(node));
        for k in 0..edges.len() {
            let local = if reverse { edges.len() - 1 - k } else { k };
            let edge = &edges[local];
            if !self.is_outgoing(node, edge) {
                continue;
            }

            let target = edge.target_node();
            let at = EdgeIndex::new(node, local);
            let second = match G::FLAVOUR {
                GraphFlavour::Directed | GraphFlavour::DirectedEmbedded => false,
                GraphFlavour::Undirected if target == node => {
                    loop_open = !loop_open;
                    !loop_open
                }
                GraphFlavour::UndirectedEmbedded if target == node => {
                    let partner = edge.complementary_index().unwrap_or(local);
                    if reverse {
                        partner > local
                    } else {
                        partner < local
                    }
                }
                GraphFlavour::Undirected | GraphFlavour::UndirectedEmbedded => self.processed[target],
            };

            self.pending.push_back(if second {
                TraversalEvent::EdgeSecond(at)
            } else {
                TraversalEvent::EdgeFirst(at)
            });
            if !self.discovered[target] {
                self.push_node(target, Some(at));
            }
        }
        self.processed[node] = true;
        self.pending.push_back(TraversalEvent::Finished(node));
    }

    /// Advances the top depth-first frame by one edge, or finishes it.
    fn step_frame(&mut self) -> bool {
        let graph = self.graph;
        let Frontier::Frames(frames) = &mut self.frontier else {
            return false;
        };
        let Some(frame) = frames.last_mut() else {
            return false;
        };

        let node = frame.node;
        let edges = graph.partition(node);
        if frame.next >= edges.len() {
            frames.pop();
            self.processed[node] = true;
            self.pending.push_back(TraversalEvent::Finished(node));
            return true;
        }

        let local = frame.next;
        frame.next += 1;
        let edge = &edges[local];
        let target = edge.target_node();

        let fire = match G::FLAVOUR {
            GraphFlavour::Directed => true,
            GraphFlavour::DirectedEmbedded => !edge.inverted() && edge.source_node() == Some(node),
            GraphFlavour::Undirected if target == node => {
                frame.loop_open = !frame.loop_open;
                frame.loop_open
            }
            GraphFlavour::UndirectedEmbedded if target == node => {
                edge.complementary_index().map_or(true, |partner| partner > local)
            }
            GraphFlavour::Undirected => {
                if frame.parent == Some(target) {
                    frame.parent = None;
                    false
                } else {
                    !self.processed[target]
                }
            }
            GraphFlavour::UndirectedEmbedded => {
                frame.tree_partner != Some(local) && !self.processed[target]
            }
        };

        if fire {
            let at = EdgeIndex::new(node, local);
            self.pending.push_back(TraversalEvent::EdgeFirst(at));
            if !self.discovered[target] {
                self.push_node(target, Some(at));
            }
        }
        true
    }

    /// Seeds the next component, if the conditions allow one.
    fn restart(&mut self) -> bool {
        if self.conditions.disconnected == Disconnected::Ignore {
            return false;
        }
        while self.restart < self.discovered.len() && self.discovered[self.restart] {
            self.restart += 1;
        }
        if self.restart == self.discovered.len() {
            return false;
        }
        self.push_node(self.restart, None);
        true
    }

    fn advance(&mut self) -> bool {
        if matches!(self.frontier, Frontier::Frames(_)) {
            if self.step_frame() {
                return true;
            }
        } else if let Some(node) = self.pop_node() {
            self.expand(node);
            return true;
        }
        self.restart()
    }
}

impl<G: Network> Iterator for Traversal<'_, G> {
    type Item = TraversalEvent;

    fn next(&mut self) -> Option<TraversalEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedEmbeddedGraph, EdgeInit, UndirectedEmbeddedGraph, UndirectedGraph};

    fn discovery<G: Network>(t: Traversal<'_, G>) -> Vec<usize> {
        t.trace().discovered
    }

    #[test]
    fn plain_loop_fires_first_then_second() {
        let g = UndirectedGraph::<()>::from_edges(vec![vec![0usize, 0]]).unwrap();
        let trace = Traversal::breadth_first(&g, Conditions::default()).unwrap().trace();
        assert_eq!(trace.first_edges, vec![EdgeIndex::new(0, 0)]);
        assert_eq!(trace.second_edges, vec![EdgeIndex::new(0, 1)]);

        let trace = Traversal::depth_first(&g, Conditions::default()).unwrap().trace();
        assert_eq!(trace.first_edges.len(), 1);
        assert!(trace.second_edges.is_empty());
    }

    #[test]
    fn embedded_loop_respects_iteration_direction() {
        let g = UndirectedEmbeddedGraph::<()>::from_edges(vec![vec![
            EdgeInit::embedded(0, 1),
            EdgeInit::embedded(0, 0),
        ]])
        .unwrap();
        let trace = Traversal::pseudo_depth_first(&g, Conditions::default()).unwrap().trace();
        assert_eq!(trace.first_edges, vec![EdgeIndex::new(0, 1)]);
        assert_eq!(trace.second_edges, vec![EdgeIndex::new(0, 0)]);
    }

    #[test]
    fn directed_embedded_follows_sources_only() {
        let mut g = DirectedEmbeddedGraph::<()>::new();
        for _ in 0..3 {
            g.add_node(());
        }
        g.join(0, 1, ()).unwrap();
        g.join(2, 1, ()).unwrap();
        let t = Traversal::breadth_first(&g, Conditions::ignore_disconnected(0)).unwrap();
        assert_eq!(discovery(t), vec![0, 1]);

        let trace = Traversal::breadth_first(&g, Conditions::default()).unwrap().trace();
        assert_eq!(trace.discovered, vec![0, 1, 2]);
        assert_eq!(trace.first_edges.len(), 2);
        assert!(trace.second_edges.is_empty());
    }
}
