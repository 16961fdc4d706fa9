//! Weight ownership policies.
//!
//! An edge does not hold its weight directly; it holds a *handle* produced by a
//! [`WeightPolicy`]. The policy decides how the value behind the handle is stored:
//!
//! - [`Independent`]: every handle owns its own copy ([`Owned`]).
//! - [`Shared`]: handles created with [`WeightPolicy::share`] refer to one
//!   reference-counted cell ([`SharedWeight`]); writes through either are
//!   visible through both.
//! - [`Pooled`]: values are deduplicated across the whole graph by a
//!   content-addressed [`DataPool`]; handles are immutable and rebinding on
//!   write ([`PooledWeight`]).
//!
//! Policies are stateful so that a pool can live inside the graph that uses it.
//! Equality between edges always compares the values, never the handles.

mod pool;
mod shared;

pub use pool::{DataPool, Pooled, PooledWeight};
pub use shared::{Shared, SharedWeight};

use core::ops::Deref;

/// Read access to the value behind a weight handle.
pub trait WeightHandle {
    /// The stored weight type.
    type Value;

    /// Guard giving shared access to the value.
    type Ref<'a>: Deref<Target = Self::Value>
    where
        Self: 'a;

    /// Borrows the current value.
    fn get(&self) -> Self::Ref<'_>;
}

/// Strategy for creating and updating edge weight handles.
pub trait WeightPolicy<T>: Default {
    /// Handle stored inside each edge.
    type Handle: WeightHandle<Value = T>;

    /// `true` when handles produced by [`share`](Self::share) alias one storage
    /// cell, so that writing one side of a pair updates the other.
    const SHARES_STORAGE: bool;

    /// Creates a handle for a fresh value.
    fn make(&mut self, value: T) -> Self::Handle;

    /// Creates a handle for the partner of `handle`.
    fn share(&mut self, handle: &Self::Handle) -> Self::Handle;

    /// Replaces the value behind `handle`.
    fn set(&mut self, handle: &mut Self::Handle, value: T);

    /// Applies `f` to the value behind `handle`.
    fn mutate<R>(&mut self, handle: &mut Self::Handle, f: impl FnOnce(&mut T) -> R) -> R;

    /// Creates a handle with its own storage holding a copy of `handle`'s value.
    fn duplicate(&mut self, handle: &Self::Handle) -> Self::Handle
    where
        T: Clone,
    {
        let value = T::clone(&handle.get());
        self.make(value)
    }

    /// Identity of the storage cell behind `handle`, for policies that alias.
    fn alias_key(_handle: &Self::Handle) -> Option<usize> {
        None
    }
}

/// Each edge owns its weight.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Independent;

/// Handle for [`Independent`] weights: the value itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Owned<T>(T);

impl<T> Owned<T> {
    /// Wraps a value.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Unwraps the value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> WeightHandle for Owned<T> {
    type Value = T;
    type Ref<'a> = &'a T where Self: 'a;

    #[inline]
    fn get(&self) -> &T {
        &self.0
    }
}

impl<T: Clone> WeightPolicy<T> for Independent {
    type Handle = Owned<T>;

    const SHARES_STORAGE: bool = false;

    #[inline]
    fn make(&mut self, value: T) -> Owned<T> {
        Owned(value)
    }

    #[inline]
    fn share(&mut self, handle: &Owned<T>) -> Owned<T> {
        handle.clone()
    }

    #[inline]
    fn set(&mut self, handle: &mut Owned<T>, value: T) {
        handle.0 = value;
    }

    #[inline]
    fn mutate<R>(&mut self, handle: &mut Owned<T>, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_one_side<P: WeightPolicy<i32>>() -> (i32, i32) {
        let mut policy = P::default();
        let mut a = policy.make(3);
        let b = policy.share(&a);
        policy.set(&mut a, 7);
        let read = (*a.get(), *b.get());
        read
    }

    #[test]
    fn independent_handles_do_not_alias() {
        assert_eq!(write_one_side::<Independent>(), (7, 3));
    }

    #[test]
    fn shared_handles_alias() {
        assert_eq!(write_one_side::<Shared>(), (7, 7));
    }

    #[test]
    fn pooled_handles_rebind_on_write() {
        assert_eq!(write_one_side::<Pooled<i32>>(), (7, 3));
    }

    #[test]
    fn independent_mutate_returns_closure_result() {
        let mut policy = Independent;
        let mut a: Owned<Vec<i32>> = policy.make(vec![1, 2]);
        let len = policy.mutate(&mut a, |v: &mut Vec<i32>| {
            v.push(3);
            v.len()
        });
        assert_eq!(len, 3);
        assert_eq!(a.into_inner(), vec![1, 2, 3]);
    }
}
