//! Graph flavours.
//!
//! A flavour is a zero-sized marker choosing directedness and the edge layout.

use serde::{Deserialize, Serialize};

use super::edge::{EmbeddedEdge, EmbeddedPartialEdge, GraphEdge, PartialEdge};
use crate::weight::WeightPolicy;

/// Run-time tag for the four flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphFlavour {
    /// Each connection stored from both ends as plain edges.
    Undirected,
    /// Each connection stored from both ends with complementary indices.
    UndirectedEmbedded,
    /// Each edge stored once, in its source's partition.
    Directed,
    /// Each edge stored in both its source's and its target's partition.
    DirectedEmbedded,
}

impl GraphFlavour {
    /// `true` for the two directed flavours.
    pub const fn is_directed(self) -> bool {
        matches!(self, Self::Directed | Self::DirectedEmbedded)
    }

    /// `true` when edges carry complementary indices.
    pub const fn is_embedded(self) -> bool {
        matches!(self, Self::UndirectedEmbedded | Self::DirectedEmbedded)
    }

    /// `true` when every stored edge has a partner stored elsewhere.
    pub const fn has_partners(self) -> bool {
        !matches!(self, Self::Directed)
    }
}

/// Compile-time flavour marker.
pub trait Flavour: Copy + Default + Send + Sync + 'static {
    /// Matching run-time tag.
    const KIND: GraphFlavour;

    /// Edge layout for a given weight handle.
    type Edge<H>: GraphEdge<Handle = H>;
}

/// Plain undirected graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Undirected;

/// Undirected graph with complementary indices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndirectedEmbedded;

/// Plain directed graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Directed;

/// Directed graph with each edge visible from both endpoints.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedEmbedded;

impl Flavour for Undirected {
    const KIND: GraphFlavour = GraphFlavour::Undirected;
    type Edge<H> = PartialEdge<H>;
}

impl Flavour for UndirectedEmbedded {
    const KIND: GraphFlavour = GraphFlavour::UndirectedEmbedded;
    type Edge<H> = EmbeddedPartialEdge<H>;
}

impl Flavour for Directed {
    const KIND: GraphFlavour = GraphFlavour::Directed;
    type Edge<H> = PartialEdge<H>;
}

impl Flavour for DirectedEmbedded {
    const KIND: GraphFlavour = GraphFlavour::DirectedEmbedded;
    type Edge<H> = EmbeddedEdge<H>;
}

/// Stored edge type for a flavour, weight type and policy.
pub type EdgeOf<F, W, P> = <F as Flavour>::Edge<<P as WeightPolicy<W>>::Handle>;
