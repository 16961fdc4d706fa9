//! Task dispatch for traversal callbacks.
//!
//! A traversal produces work items (node or edge indices) in discovery order;
//! a [`TaskDispatcher`] runs one task per item and hands back the results in
//! that same order, whatever order the tasks completed in.
//!
//! - [`Serial`]: runs each task inline on the calling thread.
//! - [`Asynchronous`]: one scoped thread per task, joined in submission order.
//! - [`WorkerPool`]: a fixed number of scoped workers sharing a [`TaskQueue`].
//!
//! A panicking task does not unwind through the dispatcher; it is reported as
//! [`DispatchError::TaskPanicked`].

pub mod asynchronous;
pub mod pool;
pub mod serial;
pub mod task_queue;

pub use asynchronous::Asynchronous;
pub use pool::{PoolConfig, WorkerPool};
pub use serial::Serial;
pub use task_queue::TaskQueue;

use std::any::Any;

use thiserror::Error;

/// Errors raised while dispatching tasks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A task panicked.
    #[error("task {index} panicked: {message}")]
    TaskPanicked {
        /// Submission index of the failed task.
        index: usize,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// A worker pool was requested with zero workers.
    #[error("worker pool needs at least one worker")]
    NoWorkers,

    /// The system refused to start a thread.
    #[error("could not start a thread for task {index}: {message}")]
    SpawnFailed {
        /// Submission index of the first task left unstarted.
        index: usize,
        /// Error reported by the operating system.
        message: String,
    },

    /// A worker thread died without reporting a result.
    #[error("worker lost before task {index} completed")]
    WorkerLost {
        /// First submission index without a result.
        index: usize,
    },
}

/// Runs one task per item and returns the results in item order.
pub trait TaskDispatcher {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Applies `task` to every item of `items`.
    ///
    /// `items` is consumed on the calling thread, so a lazy traversal keeps
    /// producing work while earlier tasks run.
    fn run<I, T, R, F>(&self, items: I, task: F) -> Result<Vec<R>, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync;
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("non-string panic payload")
    }
}
