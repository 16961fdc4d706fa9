//! Partitioned sequences.
//!
//! A partitioned sequence is an ordered list of partitions, each an ordered
//! list of elements. The connectivity layer stores one partition per node.
//! Partition and element indices passed to these containers are assumed to be
//! valid; callers range-check before calling and out-of-range indices panic.

/// Storage for an ordered sequence of partitions.
pub trait PartitionedStorage<T>: Default {
    /// Number of partitions.
    fn num_partitions(&self) -> usize;

    /// Total number of elements across all partitions.
    fn len(&self) -> usize;

    /// Returns `true` if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements of partition `i`.
    fn partition(&self, i: usize) -> &[T];

    /// Mutable elements of partition `i`.
    fn partition_mut(&mut self, i: usize) -> &mut [T];

    /// Appends an empty partition.
    fn push_partition(&mut self);

    /// Inserts an empty partition so that it becomes partition `pos`.
    fn insert_partition(&mut self, pos: usize);

    /// Removes partition `pos` and all of its elements.
    fn erase_partition(&mut self, pos: usize);

    /// Exchanges the contents of partitions `i` and `j`.
    fn swap_partitions(&mut self, i: usize, j: usize);

    /// Inserts `value` at position `pos` of partition `i`.
    fn insert_to_partition(&mut self, i: usize, pos: usize, value: T);

    /// Appends `value` to partition `i`.
    fn push_to_partition(&mut self, i: usize, value: T) {
        let pos = self.partition(i).len();
        self.insert_to_partition(i, pos, value);
    }

    /// Removes and returns the element at position `pos` of partition `i`.
    fn erase_from_partition(&mut self, i: usize, pos: usize) -> T;

    /// Reserves room for `additional` more partitions.
    fn reserve_partitions(&mut self, additional: usize);

    /// Reserves room for `additional` more elements in partition `i`.
    fn reserve_partition(&mut self, i: usize, additional: usize);

    /// Element capacity.
    fn capacity(&self) -> usize;

    /// Releases unused capacity.
    fn shrink_to_fit(&mut self);

    /// Removes all partitions.
    fn clear(&mut self);
}

/// Selects the partitioned container used for edges.
pub trait Backing: 'static {
    /// Container holding elements of type `T`.
    type Storage<T>: PartitionedStorage<T>;
}

/// One flat buffer plus partition offsets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contiguous;

/// One buffer per partition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bucketed;

impl Backing for Contiguous {
    type Storage<T> = ContiguousPartitions<T>;
}

impl Backing for Bucketed {
    type Storage<T> = BucketedPartitions<T>;
}

/// Partitions packed into a single buffer, CSR style.
///
/// `offsets` always has one more entry than there are partitions; partition
/// `i` occupies `data[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone)]
pub struct ContiguousPartitions<T> {
    data: Vec<T>,
    offsets: Vec<usize>,
}

impl<T> Default for ContiguousPartitions<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            offsets: vec![0],
        }
    }
}

impl<T> ContiguousPartitions<T> {
    #[inline]
    fn bounds(&self, i: usize) -> (usize, usize) {
        (self.offsets[i], self.offsets[i + 1])
    }
}

impl<T> PartitionedStorage<T> for ContiguousPartitions<T> {
    #[inline]
    fn num_partitions(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn partition(&self, i: usize) -> &[T] {
        let (start, end) = self.bounds(i);
        &self.data[start..end]
    }

    #[inline]
    fn partition_mut(&mut self, i: usize) -> &mut [T] {
        let (start, end) = self.bounds(i);
        &mut self.data[start..end]
    }

    fn push_partition(&mut self) {
        self.offsets.push(self.data.len());
    }

    fn insert_partition(&mut self, pos: usize) {
        let start = self.offsets[pos];
        self.offsets.insert(pos, start);
    }

    fn erase_partition(&mut self, pos: usize) {
        let (start, end) = self.bounds(pos);
        self.data.drain(start..end);
        self.offsets.remove(pos + 1);
        let removed = end - start;
        for offset in &mut self.offsets[pos + 1..] {
            *offset -= removed;
        }
    }

    fn swap_partitions(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let (a_start, a_end) = self.bounds(i);
        let (b_start, b_end) = self.bounds(j);
        let len_a = a_end - a_start;
        let len_b = b_end - b_start;
        let middle = b_start - a_end;

        // [A, middle, B] -> [middle, B, A] -> [B, middle, A]
        let span = &mut self.data[a_start..b_end];
        span.rotate_left(len_a);
        span[..middle + len_b].rotate_left(middle);

        for offset in &mut self.offsets[i + 1..=j] {
            *offset = *offset - len_a + len_b;
        }
    }

    fn insert_to_partition(&mut self, i: usize, pos: usize, value: T) {
        let start = self.offsets[i];
        self.data.insert(start + pos, value);
        for offset in &mut self.offsets[i + 1..] {
            *offset += 1;
        }
    }

    fn erase_from_partition(&mut self, i: usize, pos: usize) -> T {
        let start = self.offsets[i];
        let value = self.data.remove(start + pos);
        for offset in &mut self.offsets[i + 1..] {
            *offset -= 1;
        }
        value
    }

    fn reserve_partitions(&mut self, additional: usize) {
        self.offsets.reserve(additional);
    }

    fn reserve_partition(&mut self, _i: usize, additional: usize) {
        self.data.reserve(additional);
    }

    fn capacity(&self) -> usize {
        self.data.capacity()
    }

    fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
        self.offsets.shrink_to_fit();
    }

    fn clear(&mut self) {
        self.data.clear();
        self.offsets.clear();
        self.offsets.push(0);
    }
}

/// One `Vec` per partition.
#[derive(Debug, Clone)]
pub struct BucketedPartitions<T> {
    buckets: Vec<Vec<T>>,
}

impl<T> Default for BucketedPartitions<T> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<T> PartitionedStorage<T> for BucketedPartitions<T> {
    #[inline]
    fn num_partitions(&self) -> usize {
        self.buckets.len()
    }

    fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[inline]
    fn partition(&self, i: usize) -> &[T] {
        &self.buckets[i]
    }

    #[inline]
    fn partition_mut(&mut self, i: usize) -> &mut [T] {
        &mut self.buckets[i]
    }

    fn push_partition(&mut self) {
        self.buckets.push(Vec::new());
    }

    fn insert_partition(&mut self, pos: usize) {
        self.buckets.insert(pos, Vec::new());
    }

    fn erase_partition(&mut self, pos: usize) {
        self.buckets.remove(pos);
    }

    fn swap_partitions(&mut self, i: usize, j: usize) {
        self.buckets.swap(i, j);
    }

    fn insert_to_partition(&mut self, i: usize, pos: usize, value: T) {
        self.buckets[i].insert(pos, value);
    }

    fn push_to_partition(&mut self, i: usize, value: T) {
        self.buckets[i].push(value);
    }

    fn erase_from_partition(&mut self, i: usize, pos: usize) -> T {
        self.buckets[i].remove(pos)
    }

    fn reserve_partitions(&mut self, additional: usize) {
        self.buckets.reserve(additional);
    }

    fn reserve_partition(&mut self, i: usize, additional: usize) {
        self.buckets[i].reserve(additional);
    }

    fn capacity(&self) -> usize {
        self.buckets.iter().map(Vec::capacity).sum()
    }

    fn shrink_to_fit(&mut self) {
        for bucket in &mut self.buckets {
            bucket.shrink_to_fit();
        }
        self.buckets.shrink_to_fit();
    }

    fn clear(&mut self) {
        self.buckets.clear();
    }
}
