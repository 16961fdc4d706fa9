//! `BinaryHeapBy` - a max-heap ordered by a comparator closure.
//!
//! `std::collections::BinaryHeap` needs `Ord` on the element; priority-first
//! search orders nodes by a weight looked up elsewhere, so the ordering lives
//! in the heap instead.

use core::cmp::Ordering;
use core::fmt;

/// A binary max-heap whose order is given by `cmp`.
///
/// The top element is one for which `cmp(top, other)` is never `Less`.
pub struct BinaryHeapBy<T, C> {
    data: Vec<T>,
    cmp: C,
}

impl<T, C> BinaryHeapBy<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty heap.
    pub fn new(cmp: C) -> Self {
        Self {
            data: Vec::new(),
            cmp,
        }
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, cmp: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pushes an item onto the heap.
    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    /// Pops the greatest item.
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let item = self.data.pop()?;
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    /// Returns the greatest item without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Removes all items.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn sift_up(&mut self, mut node: usize) {
        while node > 0 {
            let parent = (node - 1) / 2;
            if self.less(parent, node) {
                self.data.swap(parent, node);
                node = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut node: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * node + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut greater = left;
            if right < len && self.less(left, right) {
                greater = right;
            }

            if self.less(node, greater) {
                self.data.swap(node, greater);
                node = greater;
            } else {
                break;
            }
        }
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.data[a], &self.data[b]) == Ordering::Less
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BinaryHeapBy<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeapBy")
            .field("len", &self.data.len())
            .finish()
    }
}
