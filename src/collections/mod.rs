//! Backing containers for edge storage.
//!
//! - [`partitioned`]: per-node partitions of edges, either packed into one
//!   flat buffer ([`ContiguousPartitions`]) or held in one buffer per node
//!   ([`BucketedPartitions`]).
//! - [`heap`]: a binary heap ordered by a caller-supplied comparator, used by
//!   priority-first search.

pub mod heap;
pub mod partitioned;

pub use heap::BinaryHeapBy;
pub use partitioned::{
    Backing, Bucketed, BucketedPartitions, Contiguous, ContiguousPartitions, PartitionedStorage,
};
