//! Fixed-size worker pool.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::task_queue::TaskQueue;
use super::{panic_message, DispatchError, TaskDispatcher};

/// Worker pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, usize::from),
        }
    }
}

/// Runs tasks on `workers` threads pulling from one shared queue.
///
/// Each task is tagged with its submission index and its result is placed by
/// that index, so completion order across workers does not matter. Workers
/// are scoped to a single [`run`](TaskDispatcher::run) and may borrow from
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// A pool of `workers` threads.
    pub fn new(workers: usize) -> Result<Self, DispatchError> {
        if workers == 0 {
            return Err(DispatchError::NoWorkers);
        }
        Ok(Self { workers })
    }

    /// A pool sized by `config`.
    pub fn from_config(config: &PoolConfig) -> Result<Self, DispatchError> {
        Self::new(config.workers)
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

type Outcome<R> = (usize, Result<R, String>);

/// Closes the queue when the producer leaves scope, normally or by panic.
struct FinishOnDrop<'a, T>(&'a TaskQueue<T>);

impl<T> Drop for FinishOnDrop<'_, T> {
    fn drop(&mut self) {
        self.0.finish();
    }
}

impl TaskDispatcher for WorkerPool {
    fn name(&self) -> &'static str {
        "worker_pool"
    }

    fn run<I, T, R, F>(&self, items: I, task: F) -> Result<Vec<R>, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let queue: TaskQueue<(usize, T)> = TaskQueue::new();
        let outcomes: Mutex<Vec<Outcome<R>>> = Mutex::new(Vec::new());
        let task = &task;

        let submitted = thread::scope(|scope| {
            // releases the workers even if `items` unwinds
            let _finish = FinishOnDrop(&queue);
            let mut started = 0;
            let mut refusal = None;
            for _ in 0..self.workers {
                let worker = thread::Builder::new().spawn_scoped(scope, || {
                    while let Some((index, item)) = queue.pop() {
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(item)))
                            .map_err(|payload| panic_message(payload.as_ref()));
                        outcomes.lock().push((index, outcome));
                    }
                });
                match worker {
                    Ok(_) => started += 1,
                    Err(e) => {
                        refusal = Some(e.to_string());
                        break;
                    }
                }
            }
            if started == 0 {
                return Err(DispatchError::SpawnFailed {
                    index: 0,
                    message: refusal.unwrap_or_default(),
                });
            }
            if let Some(message) = refusal {
                warn!(started, requested = self.workers, %message, "running with fewer workers");
            }

            let mut submitted = 0;
            for item in items {
                queue.push((submitted, item));
                submitted += 1;
            }
            Ok(submitted)
        })?;

        let mut slots: Vec<Option<R>> = (0..submitted).map(|_| None).collect();
        let mut failure: Option<(usize, String)> = None;
        for (index, outcome) in outcomes.into_inner() {
            match outcome {
                Ok(result) => slots[index] = Some(result),
                Err(message) => {
                    if failure.as_ref().map_or(true, |(first, _)| index < *first) {
                        failure = Some((index, message));
                    }
                }
            }
        }
        if let Some((index, message)) = failure {
            return Err(DispatchError::TaskPanicked { index, message });
        }

        let results = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(DispatchError::WorkerLost { index }))
            .collect::<Result<Vec<R>, _>>()?;
        debug!(
            backend = self.name(),
            tasks = results.len(),
            workers = self.workers,
            "dispatch complete"
        );
        Ok(results)
    }
}
