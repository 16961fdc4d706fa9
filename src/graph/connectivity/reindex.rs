//! Complementary index maintenance.
//!
//! Structural mutations record how the positions inside each touched partition
//! moved in a [`Relocation`]. A single pass over the touched partitions then
//! repairs every complementary index that referred to a moved edge:
//!
//! - if the partner lives in a touched partition, the edge translates its own
//!   index through that partition's relocation;
//! - otherwise the partner did not move, and is told the edge's new position.
//!
//! Freshly inserted edges are created with their final indices and skipped.

use super::Connectivity;
use crate::collections::{Backing, PartitionedStorage};
use crate::error::{GraphError, Result};
use crate::graph::edge::{partner_node, EdgeView, GraphEdge};
use crate::graph::flavour::Flavour;
use crate::weight::WeightPolicy;

/// Position history of one partition across a mutation.
#[derive(Debug, Clone)]
pub(super) struct Relocation {
    node: usize,
    old_len: usize,
    /// For each current position, the position it held before (`None` if new).
    origin: Vec<Option<usize>>,
}

impl Relocation {
    pub(super) fn identity(node: usize, len: usize) -> Self {
        Self {
            node,
            old_len: len,
            origin: (0..len).map(Some).collect(),
        }
    }

    pub(super) fn insert(&mut self, pos: usize) {
        self.origin.insert(pos, None);
    }

    pub(super) fn erase(&mut self, pos: usize) {
        self.origin.remove(pos);
    }

    pub(super) fn swap(&mut self, i: usize, j: usize) {
        self.origin.swap(i, j);
    }

    /// Position `start + k` now holds what was at `sources[k]`.
    pub(super) fn permute(&mut self, start: usize, sources: &[usize]) {
        let snapshot: Vec<Option<usize>> = self.origin[start..start + sources.len()].to_vec();
        for (k, &src) in sources.iter().enumerate() {
            self.origin[start + k] = snapshot[src - start];
        }
    }

    /// For each old position, where it went (`None` if erased).
    fn destinations(&self) -> Vec<Option<usize>> {
        let mut moved = vec![None; self.old_len];
        for (now, before) in self.origin.iter().enumerate() {
            if let Some(before) = *before {
                moved[before] = Some(now);
            }
        }
        moved
    }
}

/// Reorders `slice` so that `slice[k]` becomes the old `slice[sources[k]]`.
///
/// `sources` must be a permutation of `0..slice.len()`.
pub(super) fn permute_in_place<T>(slice: &mut [T], sources: &[usize]) {
    let mut done = vec![false; sources.len()];
    for start in 0..sources.len() {
        if done[start] {
            continue;
        }
        let mut current = start;
        loop {
            done[current] = true;
            let next = sources[current];
            if next == start {
                break;
            }
            slice.swap(current, next);
            current = next;
        }
    }
}

fn unresolved(method: &'static str, node: usize, local: usize) -> GraphError {
    GraphError::Invariant {
        method,
        detail: format!(
            "complementary index of edge {local} at node {node} does not resolve to a partner"
        ),
    }
}

impl<F, W, P, B> Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
{
    /// Repairs complementary indices after the partitions named in
    /// `relocations` were restructured.
    pub(super) fn reindex(&mut self, method: &'static str, relocations: &[Relocation]) -> Result<()> {
        if !F::KIND.is_embedded() {
            return Ok(());
        }

        let moved: Vec<(usize, Vec<Option<usize>>)> = relocations
            .iter()
            .map(|r| (r.node, r.destinations()))
            .collect();

        for relocation in relocations {
            let host = relocation.node;
            for (local, before) in relocation.origin.iter().enumerate() {
                if before.is_none() {
                    continue;
                }
                let edge = &self.edges.partition(host)[local];
                let other = partner_node(edge, host);
                let comp = edge
                    .complementary_index()
                    .ok_or_else(|| unresolved(method, host, local))?;

                match moved.iter().find(|(node, _)| *node == other) {
                    Some((_, destinations)) => {
                        let fixed = destinations
                            .get(comp)
                            .copied()
                            .flatten()
                            .ok_or_else(|| unresolved(method, host, local))?;
                        self.edges.partition_mut(host)[local].set_complementary_index(fixed);
                    }
                    None => {
                        self.edges
                            .partition_mut(other)
                            .get_mut(comp)
                            .ok_or_else(|| unresolved(method, host, local))?
                            .set_complementary_index(local);
                    }
                }
            }
        }
        Ok(())
    }
}
