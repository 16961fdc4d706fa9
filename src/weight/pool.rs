//! Content-addressed weight pool.
//!
//! Equal values are stored once. Handles keep their value alive; the pool only
//! holds weak references and forgets values once the last handle is dropped.

use core::fmt;
use std::sync::{Arc, Weak};

use super::{WeightHandle, WeightPolicy};

/// Deduplicating store of values compared with `PartialEq`.
pub struct DataPool<T> {
    entries: Vec<Weak<T>>,
}

impl<T> DataPool<T> {
    /// Creates an empty pool.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of distinct values currently alive.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.strong_count() > 0).count()
    }

    /// Returns `true` if no value is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: PartialEq> DataPool<T> {
    /// Returns the pooled instance equal to `value`, inserting it if absent.
    pub fn make(&mut self, value: T) -> Arc<T> {
        if let Some(existing) = self
            .entries
            .iter()
            .filter_map(Weak::upgrade)
            .find(|e| **e == value)
        {
            return existing;
        }
        self.entries.retain(|e| e.strong_count() > 0);
        let fresh = Arc::new(value);
        self.entries.push(Arc::downgrade(&fresh));
        fresh
    }
}

impl<T> Default for DataPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DataPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPool").field("live", &self.len()).finish()
    }
}

/// Weights deduplicated across the whole graph.
pub struct Pooled<T> {
    pool: DataPool<T>,
}

impl<T> Pooled<T> {
    /// Read access to the underlying pool.
    pub fn pool(&self) -> &DataPool<T> {
        &self.pool
    }
}

impl<T> Default for Pooled<T> {
    fn default() -> Self {
        Self {
            pool: DataPool::new(),
        }
    }
}

impl<T> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled").field("pool", &self.pool).finish()
    }
}

/// Handle for [`Pooled`] weights. Writes rebind the handle to another pooled value.
pub struct PooledWeight<T>(Arc<T>);

impl<T> PooledWeight<T> {
    /// Returns `true` if both handles refer to the same pooled value.
    pub fn is_shared_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for PooledWeight<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for PooledWeight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledWeight").field(&*self.0).finish()
    }
}

impl<T> WeightHandle for PooledWeight<T> {
    type Value = T;
    type Ref<'a> = &'a T where Self: 'a;

    #[inline]
    fn get(&self) -> &T {
        &self.0
    }
}

impl<T: Clone + PartialEq> WeightPolicy<T> for Pooled<T> {
    type Handle = PooledWeight<T>;

    const SHARES_STORAGE: bool = false;

    fn make(&mut self, value: T) -> PooledWeight<T> {
        PooledWeight(self.pool.make(value))
    }

    fn share(&mut self, handle: &PooledWeight<T>) -> PooledWeight<T> {
        handle.clone()
    }

    fn set(&mut self, handle: &mut PooledWeight<T>, value: T) {
        *handle = self.make(value);
    }

    fn mutate<R>(&mut self, handle: &mut PooledWeight<T>, f: impl FnOnce(&mut T) -> R) -> R {
        let mut value = T::clone(&handle.0);
        let out = f(&mut value);
        *handle = self.make(value);
        out
    }

    fn duplicate(&mut self, handle: &PooledWeight<T>) -> PooledWeight<T> {
        self.make(T::clone(&handle.0))
    }
}
