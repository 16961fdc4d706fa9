//! Reference-counted weights shared between the two sides of a connection.

use core::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use super::{WeightHandle, WeightPolicy};

/// Paired edges alias a single weight cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shared;

/// Handle for [`Shared`] weights.
///
/// Cloning a handle aliases the cell. Rebinding a handle to a new cell leaves
/// the previously shared value untouched.
pub struct SharedWeight<T>(Arc<RwLock<T>>);

impl<T> SharedWeight<T> {
    /// Creates a handle owning a fresh cell.
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Returns `true` if both handles refer to the same cell.
    pub fn is_shared_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles referring to this cell.
    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl<T> Clone for SharedWeight<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedWeight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedWeight").field(&*self.0.read_recursive()).finish()
    }
}

impl<T> WeightHandle for SharedWeight<T> {
    type Value = T;
    type Ref<'a> = RwLockReadGuard<'a, T> where Self: 'a;

    #[inline]
    fn get(&self) -> RwLockReadGuard<'_, T> {
        self.0.read_recursive()
    }
}

impl<T> WeightPolicy<T> for Shared {
    type Handle = SharedWeight<T>;

    const SHARES_STORAGE: bool = true;

    fn make(&mut self, value: T) -> SharedWeight<T> {
        SharedWeight::new(value)
    }

    fn share(&mut self, handle: &SharedWeight<T>) -> SharedWeight<T> {
        handle.clone()
    }

    fn set(&mut self, handle: &mut SharedWeight<T>, value: T) {
        *handle.0.write() = value;
    }

    fn mutate<R>(&mut self, handle: &mut SharedWeight<T>, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = handle.0.write();
        f(&mut guard)
    }

    fn alias_key(handle: &SharedWeight<T>) -> Option<usize> {
        Some(Arc::as_ptr(&handle.0).cast::<()>() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutate_is_visible_through_partner() {
        let mut policy = Shared;
        let mut a = WeightPolicy::<String>::make(&mut policy, String::from("x"));
        let b = policy.share(&a);
        policy.mutate(&mut a, |s: &mut String| s.push('y'));
        assert_eq!(*b.get(), "xy");
        assert!(a.is_shared_with(&b));
        assert_eq!(a.holders(), 2);
    }

    #[test]
    fn rebinding_leaves_old_cell_alone() {
        let mut policy = Shared;
        let mut a = WeightPolicy::<i32>::make(&mut policy, 1);
        let b = policy.share(&a);
        a = policy.make(5);
        assert_eq!(*a.get(), 5);
        assert_eq!(*b.get(), 1);
        assert!(!a.is_shared_with(&b));
    }

    #[test]
    fn alias_key_tracks_cell_identity() {
        let mut policy = Shared;
        let a = WeightPolicy::<i32>::make(&mut policy, 1);
        let b = policy.share(&a);
        let c = policy.duplicate(&a);
        let key = <Shared as WeightPolicy<i32>>::alias_key;
        assert_eq!(key(&a), key(&b));
        assert_ne!(key(&a), key(&c));
        assert_eq!(*c.get(), 1);
    }
}
