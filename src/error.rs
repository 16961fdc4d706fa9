//! Error types for graph construction, mutation and traversal.
//!
//! Every fallible graph operation returns [`Result`]. Range errors are always
//! checked and never clamped; a broken internal cross-reference surfaces as
//! [`GraphError::Invariant`] rather than a panic.

use thiserror::Error;

/// Convenience alias used throughout the graph layer.
pub type Result<T> = core::result::Result<T, GraphError>;

/// Errors raised by node storage, connectivity and traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node index was not smaller than the graph order.
    #[error("{method}: node index {node} out of range - graph order is {order}")]
    NodeOutOfRange {
        /// Operation that rejected the index.
        method: &'static str,
        /// The offending node index.
        node: usize,
        /// Order of the graph at the time of the call.
        order: usize,
    },

    /// A local edge index was outside the node's partition.
    #[error("{method} [node: {node}]: edge index {edge} out of range - node has {len} edge(s)")]
    EdgeOutOfRange {
        /// Operation that rejected the index.
        method: &'static str,
        /// Node owning the partition.
        node: usize,
        /// The offending local edge index.
        edge: usize,
        /// Number of edges in the partition.
        len: usize,
    },

    /// An insertion position was past the end of a partition.
    #[error("{method} [node: {node}]: insertion position {position} out of range - partition has {len} edge(s)")]
    InsertionOutOfRange {
        /// Operation that rejected the position.
        method: &'static str,
        /// Node owning the partition.
        node: usize,
        /// The offending insertion position.
        position: usize,
        /// Number of edges in the partition.
        len: usize,
    },

    /// A structural change was requested from storage whose order is fixed.
    #[error("{method}: node storage has a fixed order of {order}")]
    FixedOrder {
        /// Operation that was refused.
        method: &'static str,
        /// The fixed number of nodes.
        order: usize,
    },

    /// A tree node was given a parent that is not another node of the tree.
    #[error("{method}: parent {parent} is not a node of the tree - tree order is {order}")]
    InvalidParent {
        /// Operation that rejected the parent.
        method: &'static str,
        /// The offending parent index.
        parent: usize,
        /// Order of the tree once the new node is in place.
        order: usize,
    },

    /// The number of supplied node weights differs from the number of partitions.
    #[error("node weights count {weights} does not match graph order {order}")]
    NodeWeightCount {
        /// Number of node weights supplied.
        weights: usize,
        /// Number of edge partitions supplied.
        order: usize,
    },

    /// An edge initializer failed validation.
    #[error("invalid initializer at [node: {node}, edge: {edge}]: {reason}")]
    InvalidInitializer {
        /// Partition holding the rejected entry.
        node: usize,
        /// Local index of the rejected entry.
        edge: usize,
        /// What was wrong with it.
        reason: InitError,
    },

    /// An internal cross-reference was found inconsistent.
    #[error("{method}: invariant violated - {detail}")]
    Invariant {
        /// Operation that detected the violation.
        method: &'static str,
        /// Human readable description.
        detail: String,
    },
}

/// Reasons an edge initializer can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    /// Target node index is not smaller than the number of partitions.
    #[error("target {target} out of range")]
    TargetOutOfRange {
        /// The offending target.
        target: usize,
    },

    /// Source node index is not smaller than the number of partitions.
    #[error("source {node} out of range")]
    SourceOutOfRange {
        /// The offending source node.
        node: usize,
    },

    /// An embedded edge was given without a complementary index.
    #[error("complementary index missing")]
    MissingComplementary,

    /// A directed embedded edge was given without a source.
    #[error("source node missing")]
    MissingSource,

    /// The complementary index lies outside the partner partition.
    #[error("complementary index {index} out of range for partner partition of length {len}")]
    ComplementaryOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the partner partition.
        len: usize,
    },

    /// The partner edge does not point back to this edge.
    #[error("reciprocated complementary index does not match")]
    ComplementaryMismatch,

    /// A loop's complementary index refers to the loop itself.
    #[error("complementary index is self-referential")]
    SelfReferential,

    /// A plain undirected edge has no matching reverse entry.
    #[error("reciprocated partial edge does not exist")]
    Unreciprocated,

    /// A plain undirected loop appears an odd number of times.
    #[error("odd number of loop entries")]
    OddLoops,

    /// The partner edge carries a different weight.
    #[error("mismatch between weights")]
    WeightMismatch,

    /// A directed embedded edge is stored in a partition that is neither its source nor its target.
    #[error("host node is neither source nor target")]
    ForeignHost,

    /// The partner of a directed embedded edge has different endpoints.
    #[error("partner endpoints do not match")]
    EndpointMismatch,
}
