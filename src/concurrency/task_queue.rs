//! Blocking FIFO shared by pool workers.

use std::collections::VecDeque;

use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex};

struct State<T> {
    items: VecDeque<T>,
    finished: bool,
}

/// An unbounded multi-producer multi-consumer queue.
///
/// [`pop`](TaskQueue::pop) blocks until an item arrives or the queue is
/// [`finish`](TaskQueue::finish)ed; after that it drains what is left and
/// then returns `None`.
pub struct TaskQueue<T> {
    state: CachePadded<Mutex<State<T>>>,
    ready: Condvar,
}

impl<T> TaskQueue<T> {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self {
            state: CachePadded::new(Mutex::new(State {
                items: VecDeque::new(),
                finished: false,
            })),
            ready: Condvar::new(),
        }
    }

    /// Appends an item and wakes one waiting consumer.
    pub fn push(&self, item: T) {
        self.state.lock().items.push_back(item);
        self.ready.notify_one();
    }

    /// Removes the oldest item, blocking while the queue is empty and open.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.finished {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    /// Removes the oldest item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.state.lock().items.pop_front()
    }

    /// Closes the queue; blocked consumers wake up and drain it.
    pub fn finish(&self) {
        self.state.lock().finished = true;
        self.ready.notify_all();
    }

    /// Returns `true` once [`finish`](TaskQueue::finish) was called.
    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Returns `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
