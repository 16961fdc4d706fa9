//! Construction from per-node edge lists.
//!
//! Each node lists the edges stored in its partition. Plain undirected graphs
//! list every connection from both ends (a loop appears twice in its node's
//! list) and the two entries are matched in order. Embedded graphs carry the
//! complementary index of each entry explicitly; directed embedded entries also
//! carry their source.

use core::marker::PhantomData;

use tracing::debug;

use super::Connectivity;
use crate::collections::{Backing, PartitionedStorage};
use crate::error::{GraphError, InitError, Result};
use crate::graph::edge::{EdgeIndex, EdgeParts, EdgeView, GraphEdge};
use crate::graph::flavour::{EdgeOf, Flavour, GraphFlavour};
use crate::weight::{WeightHandle, WeightPolicy};

/// One entry of an edge initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeInit<W> {
    /// Node the edge points at.
    pub target: usize,
    /// Tail of the edge; required for directed embedded graphs.
    pub source: Option<usize>,
    /// Position of the partner entry; required for embedded graphs.
    pub complementary: Option<usize>,
    /// Edge weight.
    pub weight: W,
}

impl<W> EdgeInit<W> {
    /// Entry pointing at `target` with the given weight.
    pub const fn new(target: usize, weight: W) -> Self {
        Self {
            target,
            source: None,
            complementary: None,
            weight,
        }
    }

    /// Sets the complementary index.
    #[must_use]
    pub fn with_complementary(mut self, index: usize) -> Self {
        self.complementary = Some(index);
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: usize) -> Self {
        self.source = Some(source);
        self
    }
}

impl EdgeInit<()> {
    /// Unweighted entry pointing at `target`.
    pub const fn to(target: usize) -> Self {
        Self::new(target, ())
    }

    /// Unweighted embedded entry.
    pub const fn embedded(target: usize, complementary: usize) -> Self {
        Self {
            target,
            source: None,
            complementary: Some(complementary),
            weight: (),
        }
    }
}

impl From<usize> for EdgeInit<()> {
    fn from(target: usize) -> Self {
        Self::to(target)
    }
}

impl<W> From<(usize, W)> for EdgeInit<W> {
    fn from((target, weight): (usize, W)) -> Self {
        Self::new(target, weight)
    }
}

impl<W> From<(usize, usize, W)> for EdgeInit<W> {
    fn from((target, complementary, weight): (usize, usize, W)) -> Self {
        Self::new(target, weight).with_complementary(complementary)
    }
}

fn reject(node: usize, edge: usize, reason: InitError) -> GraphError {
    GraphError::InvalidInitializer { node, edge, reason }
}

fn check_targets<W>(partitions: &[Vec<EdgeInit<W>>]) -> Result<()> {
    let order = partitions.len();
    for (node, inits) in partitions.iter().enumerate() {
        if let Some((local, init)) = inits.iter().enumerate().find(|(_, i)| i.target >= order) {
            return Err(reject(
                node,
                local,
                InitError::TargetOutOfRange {
                    target: init.target,
                },
            ));
        }
    }
    Ok(())
}

/// Matches plain undirected entries with their reverse entries, in order.
fn pair_plain<W: PartialEq>(partitions: &[Vec<EdgeInit<W>>]) -> Result<Vec<Vec<EdgeIndex>>> {
    let mut partners: Vec<Vec<Option<EdgeIndex>>> =
        partitions.iter().map(|p| vec![None; p.len()]).collect();

    for (node, inits) in partitions.iter().enumerate() {
        for (local, init) in inits.iter().enumerate() {
            if partners[node][local].is_some() {
                continue;
            }
            let target = init.target;
            if target < node {
                return Err(reject(node, local, InitError::Unreciprocated));
            }
            let skip = if target == node { local + 1 } else { 0 };
            let found = partitions[target]
                .iter()
                .enumerate()
                .skip(skip)
                .find(|&(b, candidate)| {
                    partners[target][b].is_none()
                        && candidate.target == node
                        && candidate.weight == init.weight
                })
                .map(|(b, _)| b);

            match found {
                Some(b) => {
                    partners[node][local] = Some(EdgeIndex::new(target, b));
                    partners[target][b] = Some(EdgeIndex::new(node, local));
                }
                None if target == node => return Err(reject(node, local, InitError::OddLoops)),
                None => return Err(reject(node, local, InitError::Unreciprocated)),
            }
        }
    }

    Ok(partners
        .into_iter()
        .map(|row| row.into_iter().flatten().collect())
        .collect())
}

/// Validates explicit complementary indices.
fn pair_embedded<W: PartialEq>(
    directed: bool,
    partitions: &[Vec<EdgeInit<W>>],
) -> Result<Vec<Vec<EdgeIndex>>> {
    let order = partitions.len();
    let mut partners = Vec::with_capacity(order);

    for (node, inits) in partitions.iter().enumerate() {
        let mut row = Vec::with_capacity(inits.len());
        for (local, init) in inits.iter().enumerate() {
            let fail = |reason| reject(node, local, reason);

            let other = if directed {
                let source = init.source.ok_or_else(|| fail(InitError::MissingSource))?;
                if source >= order {
                    return Err(fail(InitError::SourceOutOfRange { node: source }));
                }
                if source != node && init.target != node {
                    return Err(fail(InitError::ForeignHost));
                }
                if init.target == node {
                    source
                } else {
                    init.target
                }
            } else {
                init.target
            };

            let comp = init
                .complementary
                .ok_or_else(|| fail(InitError::MissingComplementary))?;
            let candidates = &partitions[other];
            let partner = candidates.get(comp).ok_or_else(|| {
                fail(InitError::ComplementaryOutOfRange {
                    index: comp,
                    len: candidates.len(),
                })
            })?;

            if other == node && comp == local {
                return Err(fail(InitError::SelfReferential));
            }
            if directed {
                if partner.source != init.source || partner.target != init.target {
                    return Err(fail(InitError::EndpointMismatch));
                }
            } else if partner.target != node {
                return Err(fail(InitError::ComplementaryMismatch));
            }
            if partner.complementary != Some(local) {
                return Err(fail(InitError::ComplementaryMismatch));
            }
            if partner.weight != init.weight {
                return Err(fail(InitError::WeightMismatch));
            }

            row.push(EdgeIndex::new(other, comp));
        }
        partners.push(row);
    }
    Ok(partners)
}

impl<F, W, P, B> Connectivity<F, W, P, B>
where
    F: Flavour,
    P: WeightPolicy<W>,
    B: Backing,
{
    /// Builds connectivity from one list of entries per node.
    ///
    /// Paired entries share weight storage under policies that alias.
    pub fn from_init(partitions: Vec<Vec<EdgeInit<W>>>) -> Result<Self>
    where
        W: PartialEq,
    {
        let partners = Self::pair(&partitions).map_err(|e| {
            debug!(error = %e, flavour = ?F::KIND, "rejected edge initializer");
            e
        })?;

        let mut policy = P::default();
        let mut edges: B::Storage<EdgeOf<F, W, P>> = Default::default();
        edges.reserve_partitions(partitions.len());

        for (node, inits) in partitions.into_iter().enumerate() {
            edges.push_partition();
            edges.reserve_partition(node, inits.len());
            for (local, init) in inits.into_iter().enumerate() {
                let here = EdgeIndex::new(node, local);
                let partner = partners.as_ref().map(|p| p[node][local]);
                let weight = match partner {
                    Some(leader) if leader < here => {
                        policy.share(edges.partition(leader.node)[leader.local].weight_handle())
                    }
                    _ => policy.make(init.weight),
                };
                let source = init.source.unwrap_or(node);
                let inverted = F::KIND == GraphFlavour::DirectedEmbedded
                    && source == init.target
                    && partner.is_some_and(|p| p.local < local);

                edges.push_to_partition(
                    node,
                    <EdgeOf<F, W, P> as GraphEdge>::from_parts(EdgeParts {
                        source,
                        target: init.target,
                        complementary: partner.map_or(0, |p| p.local),
                        inverted,
                        weight,
                    }),
                );
            }
        }

        Ok(Self {
            edges,
            policy,
            _marker: PhantomData,
        })
    }

    fn pair(partitions: &[Vec<EdgeInit<W>>]) -> Result<Option<Vec<Vec<EdgeIndex>>>>
    where
        W: PartialEq,
    {
        check_targets(partitions)?;
        match F::KIND {
            GraphFlavour::Directed => Ok(None),
            GraphFlavour::Undirected => pair_plain(partitions).map(Some),
            GraphFlavour::UndirectedEmbedded => pair_embedded(false, partitions).map(Some),
            GraphFlavour::DirectedEmbedded => pair_embedded(true, partitions).map(Some),
        }
    }

    /// Reads the connectivity back as initializer entries.
    pub fn to_init(&self) -> Vec<Vec<EdgeInit<W>>>
    where
        W: Clone,
    {
        (0..self.order())
            .map(|node| {
                self.edges
                    .partition(node)
                    .iter()
                    .map(|edge| EdgeInit {
                        target: edge.target_node(),
                        source: if F::KIND == GraphFlavour::DirectedEmbedded {
                            edge.source_node()
                        } else {
                            None
                        },
                        complementary: edge.complementary_index(),
                        weight: W::clone(&edge.weight_handle().get()),
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pairs_match_in_order() {
        let parts: Vec<Vec<EdgeInit<i32>>> = vec![
            vec![(1, 5).into(), (1, 6).into(), (0, 2).into(), (0, 2).into()],
            vec![(0, 6).into(), (0, 5).into()],
        ];
        let pairs = pair_plain(&parts).unwrap();
        assert_eq!(pairs[0][0], EdgeIndex::new(1, 1));
        assert_eq!(pairs[0][1], EdgeIndex::new(1, 0));
        assert_eq!(pairs[0][2], EdgeIndex::new(0, 3));
        assert_eq!(pairs[0][3], EdgeIndex::new(0, 2));
    }

    #[test]
    fn plain_rejects_unmatched_entries() {
        let lonely: Vec<Vec<EdgeInit<()>>> = vec![vec![1.into()], vec![]];
        assert_eq!(
            pair_plain(&lonely),
            Err(reject(0, 0, InitError::Unreciprocated))
        );

        let odd: Vec<Vec<EdgeInit<()>>> = vec![vec![0.into(), 0.into(), 0.into()]];
        assert_eq!(pair_plain(&odd), Err(reject(0, 2, InitError::OddLoops)));

        let backwards: Vec<Vec<EdgeInit<()>>> = vec![vec![], vec![0.into()]];
        assert_eq!(
            pair_plain(&backwards),
            Err(reject(1, 0, InitError::Unreciprocated))
        );
    }

    #[test]
    fn embedded_validation_reasons() {
        let self_ref = vec![vec![EdgeInit::embedded(0, 0), EdgeInit::embedded(0, 0)]];
        assert_eq!(
            pair_embedded(false, &self_ref),
            Err(reject(0, 0, InitError::SelfReferential))
        );

        let mismatch = vec![vec![EdgeInit::embedded(1, 0)], vec![EdgeInit::embedded(0, 1)]];
        assert_eq!(
            pair_embedded(false, &mismatch),
            Err(reject(0, 0, InitError::ComplementaryMismatch))
        );

        let missing = vec![vec![EdgeInit::to(0)]];
        assert_eq!(
            pair_embedded(false, &missing),
            Err(reject(0, 0, InitError::MissingComplementary))
        );

        let foreign = vec![
            vec![EdgeInit::embedded(1, 0).with_source(2)],
            vec![],
            vec![],
        ];
        assert_eq!(
            pair_embedded(true, &foreign),
            Err(reject(0, 0, InitError::ForeignHost))
        );

        let weights: Vec<Vec<EdgeInit<f64>>> =
            vec![vec![(1, 0, 1.0).into()], vec![(0, 0, 2.0).into()]];
        assert_eq!(
            pair_embedded(false, &weights),
            Err(reject(0, 0, InitError::WeightMismatch))
        );
    }
}
