//! Per-node weight storage.
//!
//! [`NodeStorage`] grows and shrinks with the graph and routes every weight
//! through a [`WeightPolicy`], so node weights can be pooled or shared the
//! same way edge weights are. [`FixedNodeStorage`] holds exactly `N` weights
//! inline; its order never changes.

use core::fmt;
use core::ops::Range;

use crate::error::{GraphError, Result};
use crate::weight::{Independent, WeightHandle, WeightPolicy};

/// Borrowed node weight produced by the policy's handle.
pub type NodeRef<'a, W, P> = <<P as WeightPolicy<W>>::Handle as WeightHandle>::Ref<'a>;

/// Ordered, index-addressed node weights.
///
/// Inserting or erasing at index `i` shifts every node above `i`.
pub struct NodeStorage<W, P = Independent>
where
    P: WeightPolicy<W>,
{
    weights: Vec<P::Handle>,
    policy: P,
}

impl<W, P> NodeStorage<W, P>
where
    P: WeightPolicy<W>,
{
    /// Creates empty storage.
    pub fn new() -> Self {
        Self {
            weights: Vec::new(),
            policy: P::default(),
        }
    }

    /// Creates storage from existing weights.
    pub fn from_weights(weights: Vec<W>) -> Self {
        weights.into_iter().collect()
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if there are no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The policy that created the handles.
    pub fn weight_policy(&self) -> &P {
        &self.policy
    }

    /// Weight handles in index order.
    #[inline]
    pub fn handles(&self) -> &[P::Handle] {
        &self.weights
    }

    /// Iterates over the weights in index order.
    pub fn iter(&self) -> Weights<'_, P::Handle> {
        Weights {
            inner: self.weights.iter(),
        }
    }

    /// Copies the weights out in index order.
    pub fn to_vec(&self) -> Vec<W>
    where
        W: Clone,
    {
        self.iter().map(|w| W::clone(&w)).collect()
    }

    fn check(&self, method: &'static str, node: usize) -> Result<()> {
        if node < self.weights.len() {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange {
                method,
                node,
                order: self.weights.len(),
            })
        }
    }

    /// Weight of `node`.
    pub fn node_weight(&self, node: usize) -> Result<NodeRef<'_, W, P>> {
        self.check("node_weight", node)?;
        Ok(self.weights[node].get())
    }

    /// Replaces the weight of `node`.
    pub fn set_node_weight(&mut self, node: usize, weight: W) -> Result<()> {
        self.check("set_node_weight", node)?;
        self.policy.set(&mut self.weights[node], weight);
        Ok(())
    }

    /// Applies `f` to the weight of `node`.
    pub fn mutate_node_weight<R>(&mut self, node: usize, f: impl FnOnce(&mut W) -> R) -> Result<R> {
        self.check("mutate_node_weight", node)?;
        Ok(self.policy.mutate(&mut self.weights[node], f))
    }

    /// Appends a node and returns its index.
    pub fn add_node(&mut self, weight: W) -> usize {
        let handle = self.policy.make(weight);
        self.weights.push(handle);
        self.weights.len() - 1
    }

    /// Inserts a node at `pos`; `pos == len()` appends.
    pub fn insert_node(&mut self, pos: usize, weight: W) -> Result<usize> {
        if pos > self.weights.len() {
            return Err(GraphError::NodeOutOfRange {
                method: "insert_node",
                node: pos,
                order: self.weights.len(),
            });
        }
        let handle = self.policy.make(weight);
        self.weights.insert(pos, handle);
        Ok(pos)
    }

    /// Removes the node at `pos`.
    pub fn erase_node(&mut self, pos: usize) -> Result<()> {
        self.check("erase_node", pos)?;
        self.weights.remove(pos);
        Ok(())
    }

    /// Removes the nodes in `range`.
    pub fn erase_nodes(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.weights.len() {
            return Err(GraphError::NodeOutOfRange {
                method: "erase_nodes",
                node: range.end.max(range.start),
                order: self.weights.len(),
            });
        }
        self.weights.drain(range);
        Ok(())
    }

    /// Exchanges the weights of two nodes.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        self.check("swap_nodes", i)?;
        self.check("swap_nodes", j)?;
        self.weights.swap(i, j);
        Ok(())
    }

    /// Reserves room for `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) {
        self.weights.reserve(additional);
    }

    /// Node capacity.
    pub fn capacity(&self) -> usize {
        self.weights.capacity()
    }

    /// Releases unused capacity.
    pub fn shrink_to_fit(&mut self) {
        self.weights.shrink_to_fit();
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.weights.clear();
    }
}

impl<W, P> Default for NodeStorage<W, P>
where
    P: WeightPolicy<W>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Deep copy: the copy gets its own policy and its own weight cells.
impl<W, P> Clone for NodeStorage<W, P>
where
    W: Clone,
    P: WeightPolicy<W>,
{
    fn clone(&self) -> Self {
        let mut policy = P::default();
        let weights = self.weights.iter().map(|h| policy.duplicate(h)).collect();
        Self { weights, policy }
    }
}

impl<W, P> PartialEq for NodeStorage<W, P>
where
    W: PartialEq,
    P: WeightPolicy<W>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| *a == *b)
    }
}

impl<W, P> fmt::Debug for NodeStorage<W, P>
where
    W: fmt::Debug,
    P: WeightPolicy<W>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for handle in &self.weights {
            list.entry(&*handle.get());
        }
        list.finish()
    }
}

impl<W, P> FromIterator<W> for NodeStorage<W, P>
where
    P: WeightPolicy<W>,
{
    fn from_iter<I: IntoIterator<Item = W>>(iter: I) -> Self {
        let mut policy = P::default();
        let weights = iter.into_iter().map(|w| policy.make(w)).collect();
        Self { weights, policy }
    }
}

impl<'a, W, P> IntoIterator for &'a NodeStorage<W, P>
where
    P: WeightPolicy<W>,
{
    type Item = <P::Handle as WeightHandle>::Ref<'a>;
    type IntoIter = Weights<'a, P::Handle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over node weights, see [`NodeStorage::iter`].
pub struct Weights<'a, H> {
    inner: core::slice::Iter<'a, H>,
}

impl<'a, H: WeightHandle + 'a> Iterator for Weights<'a, H> {
    type Item = H::Ref<'a>;

    #[inline]
    fn next(&mut self) -> Option<H::Ref<'a>> {
        self.inner.next().map(|h| h.get())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, H: WeightHandle + 'a> ExactSizeIterator for Weights<'a, H> {}

/// Exactly `N` node weights held inline.
///
/// Weights can be read, replaced and swapped, but the order is fixed:
/// inserting or erasing fails with [`GraphError::FixedOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedNodeStorage<W, const N: usize> {
    weights: [W; N],
}

impl<W, const N: usize> FixedNodeStorage<W, N> {
    /// Wraps `N` weights.
    pub const fn from_weights(weights: [W; N]) -> Self {
        Self { weights }
    }

    /// Number of nodes, always `N`.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` when `N == 0`.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// All weights in index order.
    #[inline]
    pub fn node_weights(&self) -> &[W; N] {
        &self.weights
    }

    /// Iterates over the weights in index order.
    pub fn iter(&self) -> core::slice::Iter<'_, W> {
        self.weights.iter()
    }

    fn check(method: &'static str, node: usize) -> Result<()> {
        if node < N {
            Ok(())
        } else {
            Err(GraphError::NodeOutOfRange { method, node, order: N })
        }
    }

    /// Weight of `node`.
    pub fn node_weight(&self, node: usize) -> Result<&W> {
        Self::check("node_weight", node)?;
        Ok(&self.weights[node])
    }

    /// Replaces the weight of `node`.
    pub fn set_node_weight(&mut self, node: usize, weight: W) -> Result<()> {
        Self::check("set_node_weight", node)?;
        self.weights[node] = weight;
        Ok(())
    }

    /// Applies `f` to the weight of `node`.
    pub fn mutate_node_weight<R>(&mut self, node: usize, f: impl FnOnce(&mut W) -> R) -> Result<R> {
        Self::check("mutate_node_weight", node)?;
        Ok(f(&mut self.weights[node]))
    }

    /// Always fails: the order is fixed.
    pub fn add_node(&mut self, _weight: W) -> Result<usize> {
        Err(GraphError::FixedOrder {
            method: "add_node",
            order: N,
        })
    }

    /// Always fails: the order is fixed.
    pub fn insert_node(&mut self, _pos: usize, _weight: W) -> Result<usize> {
        Err(GraphError::FixedOrder {
            method: "insert_node",
            order: N,
        })
    }

    /// Always fails: the order is fixed.
    pub fn erase_node(&mut self, _pos: usize) -> Result<()> {
        Err(GraphError::FixedOrder {
            method: "erase_node",
            order: N,
        })
    }

    /// Exchanges the weights of two nodes.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        Self::check("swap_nodes", i)?;
        Self::check("swap_nodes", j)?;
        self.weights.swap(i, j);
        Ok(())
    }

    /// Node capacity, always `N`.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<W: Default, const N: usize> Default for FixedNodeStorage<W, N> {
    fn default() -> Self {
        Self {
            weights: core::array::from_fn(|_| W::default()),
        }
    }
}

impl<W, const N: usize> From<[W; N]> for FixedNodeStorage<W, N> {
    fn from(weights: [W; N]) -> Self {
        Self::from_weights(weights)
    }
}

impl<'a, W, const N: usize> IntoIterator for &'a FixedNodeStorage<W, N> {
    type Item = &'a W;
    type IntoIter = core::slice::Iter<'a, W>;

    fn into_iter(self) -> Self::IntoIter {
        self.weights.iter()
    }
}
