//! Callback slots for traversal events.

use serde::{Deserialize, Serialize};

use super::TraversalEvent;
use crate::graph::edge::EdgeIndex;

/// Receives traversal events; every slot defaults to a no-op.
pub trait Visitor {
    /// A node was discovered; called before its edges are processed.
    fn discover(&mut self, _node: usize) {}

    /// All edges of a node have been processed.
    fn finish(&mut self, _node: usize) {}

    /// An edge was met for the first time, from either end.
    fn first_edge(&mut self, _edge: EdgeIndex) {}

    /// The partner of an already met edge was reached.
    fn second_edge(&mut self, _edge: EdgeIndex) {}

    /// Routes one event to its slot.
    fn on_event(&mut self, event: TraversalEvent) {
        match event {
            TraversalEvent::Discovered(node) => self.discover(node),
            TraversalEvent::EdgeFirst(edge) => self.first_edge(edge),
            TraversalEvent::EdgeSecond(edge) => self.second_edge(edge),
            TraversalEvent::Finished(node) => self.finish(node),
        }
    }
}

type NodeSlot<'a> = Box<dyn FnMut(usize) + 'a>;
type EdgeSlot<'a> = Box<dyn FnMut(EdgeIndex) + 'a>;

/// A [`Visitor`] assembled from closures.
///
/// ```
/// use grove::graph::{FnVisitor, Visitor};
///
/// let mut seen = Vec::new();
/// let mut visitor = FnVisitor::new().on_discover(|n| seen.push(n));
/// visitor.discover(3);
/// drop(visitor);
/// assert_eq!(seen, vec![3]);
/// ```
#[derive(Default)]
pub struct FnVisitor<'a> {
    discover: Option<NodeSlot<'a>>,
    finish: Option<NodeSlot<'a>>,
    first_edge: Option<EdgeSlot<'a>>,
    second_edge: Option<EdgeSlot<'a>>,
}

impl<'a> FnVisitor<'a> {
    /// A visitor with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node discovery slot.
    #[must_use]
    pub fn on_discover(mut self, f: impl FnMut(usize) + 'a) -> Self {
        self.discover = Some(Box::new(f));
        self
    }

    /// Sets the node finish slot.
    #[must_use]
    pub fn on_finish(mut self, f: impl FnMut(usize) + 'a) -> Self {
        self.finish = Some(Box::new(f));
        self
    }

    /// Sets the first edge discovery slot.
    #[must_use]
    pub fn on_first_edge(mut self, f: impl FnMut(EdgeIndex) + 'a) -> Self {
        self.first_edge = Some(Box::new(f));
        self
    }

    /// Sets the second edge discovery slot.
    #[must_use]
    pub fn on_second_edge(mut self, f: impl FnMut(EdgeIndex) + 'a) -> Self {
        self.second_edge = Some(Box::new(f));
        self
    }
}

impl Visitor for FnVisitor<'_> {
    fn discover(&mut self, node: usize) {
        if let Some(f) = self.discover.as_mut() {
            f(node);
        }
    }

    fn finish(&mut self, node: usize) {
        if let Some(f) = self.finish.as_mut() {
            f(node);
        }
    }

    fn first_edge(&mut self, edge: EdgeIndex) {
        if let Some(f) = self.first_edge.as_mut() {
            f(edge);
        }
    }

    fn second_edge(&mut self, edge: EdgeIndex) {
        if let Some(f) = self.second_edge.as_mut() {
            f(edge);
        }
    }
}

/// Everything a traversal reported, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalTrace {
    /// Nodes in discovery order.
    pub discovered: Vec<usize>,
    /// Nodes in finish order.
    pub finished: Vec<usize>,
    /// Edges in first discovery order.
    pub first_edges: Vec<EdgeIndex>,
    /// Edges in second discovery order.
    pub second_edges: Vec<EdgeIndex>,
}

impl Visitor for TraversalTrace {
    fn discover(&mut self, node: usize) {
        self.discovered.push(node);
    }

    fn finish(&mut self, node: usize) {
        self.finished.push(node);
    }

    fn first_edge(&mut self, edge: EdgeIndex) {
        self.first_edges.push(edge);
    }

    fn second_edge(&mut self, edge: EdgeIndex) {
        self.second_edges.push(edge);
    }
}

impl Extend<TraversalEvent> for TraversalTrace {
    fn extend<I: IntoIterator<Item = TraversalEvent>>(&mut self, events: I) {
        for event in events {
            self.on_event(event);
        }
    }
}

impl FromIterator<TraversalEvent> for TraversalTrace {
    fn from_iter<I: IntoIterator<Item = TraversalEvent>>(events: I) -> Self {
        let mut trace = Self::default();
        trace.extend(events);
        trace
    }
}
