//! # `grove` - Graph Connectivity Storage and Traversal
//!
//! Index-addressed graphs whose edges live in one partition per node, with
//! cross references kept consistent under every structural mutation.
//!
//! ## Key Features
//!
//! - **Four flavours**: undirected, undirected embedded, directed and directed
//!   embedded. Embedded edges store the local index of their partner, so the
//!   other end of a connection is one lookup away.
//! - **Weight ownership policies**: `Independent` copies, `Shared`
//!   reference-counted cells visible from both ends, and a content-addressed
//!   `Pooled` store that deduplicates equal values.
//! - **Pluggable backing**: a flat CSR-style buffer with partition offsets
//!   (`Contiguous`) or one buffer per node (`Bucketed`).
//! - **Traversal**: breadth-first, depth-first, pseudo depth-first and
//!   priority-first search as lazy event iterators.
//! - **Ordered dispatch**: serial, thread-per-task and worker-pool backends that
//!   run one task per discovered node or edge and return results in discovery
//!   order.
//! - **Trees**: forests on top of a graph whose links run parent to child,
//!   child to parent or both ways, with subtree pruning.
//!
//! ## Architecture
//!
//! ```text
//! weight ──┐
//!          ├─> graph::connectivity ─┐
//! collections                       ├─> graph::Graph ─> graph::traversal ─> concurrency
//!          graph::nodes ────────────┘         └─> graph::tree
//! ```
//!
//! ## Example
//!
//! ```rust
//! use grove::concurrency::WorkerPool;
//! use grove::graph::{Conditions, Traversal, UndirectedGraph};
//!
//! // 0 - 1 - 2, each connection listed from both ends
//! let g = UndirectedGraph::<u32>::from_edges_and_weights(
//!     vec![vec![1usize], vec![0, 2], vec![1]],
//!     vec![10, 20, 30],
//! )
//! .unwrap();
//!
//! let order = Traversal::breadth_first(&g, Conditions::ignore_disconnected(1))
//!     .unwrap()
//!     .trace()
//!     .discovered;
//! assert_eq!(order, vec![1, 0, 2]);
//!
//! let pool = WorkerPool::new(2).unwrap();
//! let doubled = Traversal::breadth_first(&g, Conditions::default())
//!     .unwrap()
//!     .dispatch_nodes(&pool, |n| g.node_weight(n).map_or(0, |w| w * 2))
//!     .unwrap();
//! assert_eq!(doubled, vec![20, 40, 60]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod collections;
pub mod concurrency;
pub mod error;
pub mod graph;
pub mod weight;

pub use concurrency::{
    Asynchronous, DispatchError, PoolConfig, Serial, TaskDispatcher, WorkerPool,
};
pub use error::{GraphError, InitError, Result};
pub use graph::{
    Conditions, DirectedEmbeddedGraph, DirectedGraph, EdgeIndex, EdgeInit, Graph, GraphFlavour,
    JoinPoint, Strategy, Traversal, TraversalEvent, TraversalTrace, Tree, TreeInit,
    UndirectedEmbeddedGraph, UndirectedGraph, Visitor,
};
pub use weight::{Independent, Pooled, Shared, WeightHandle, WeightPolicy};
