//! One scoped thread per task.

use std::thread;

use tracing::debug;

use super::{panic_message, DispatchError, TaskDispatcher};

/// Launches every task on its own scoped thread as it is submitted, then
/// joins the handles in submission order.
///
/// All tasks run to completion; the earliest failure is reported.
///
/// Every submitted item holds an OS thread until the join, so the number of
/// live threads grows with the traversal. When the system refuses a new
/// thread, submission stops, the threads already running are joined and
/// [`DispatchError::SpawnFailed`] names the first item that could not start.
/// Prefer [`WorkerPool`](super::WorkerPool) for large graphs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Asynchronous {
    stack_size: Option<usize>,
}

impl Asynchronous {
    /// Creates the dispatcher with the platform's default thread stack size.
    pub const fn new() -> Self {
        Self { stack_size: None }
    }

    /// Uses `bytes` of stack for every task thread.
    #[must_use]
    pub const fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    fn builder(&self) -> thread::Builder {
        let builder = thread::Builder::new();
        match self.stack_size {
            Some(bytes) => builder.stack_size(bytes),
            None => builder,
        }
    }
}

impl TaskDispatcher for Asynchronous {
    fn name(&self) -> &'static str {
        "asynchronous"
    }

    fn run<I, T, R, F>(&self, items: I, task: F) -> Result<Vec<R>, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let task = &task;
        let (joined, refused) = thread::scope(|scope| {
            let mut handles = Vec::new();
            let mut refused = None;
            for item in items {
                match self.builder().spawn_scoped(scope, move || task(item)) {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        refused = Some(DispatchError::SpawnFailed {
                            index: handles.len(),
                            message: e.to_string(),
                        });
                        break;
                    }
                }
            }
            let joined: Vec<thread::Result<R>> =
                handles.into_iter().map(thread::ScopedJoinHandle::join).collect();
            (joined, refused)
        });

        let tasks = joined.len();
        let mut results = Vec::with_capacity(tasks);
        for (index, outcome) in joined.into_iter().enumerate() {
            match outcome {
                Ok(result) => results.push(result),
                Err(payload) => {
                    return Err(DispatchError::TaskPanicked {
                        index,
                        message: panic_message(payload.as_ref()),
                    })
                }
            }
        }
        if let Some(error) = refused {
            return Err(error);
        }
        debug!(backend = self.name(), tasks, "dispatch complete");
        Ok(results)
    }
}
