//! Inline dispatch.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use super::{panic_message, DispatchError, TaskDispatcher};

/// Runs every task on the calling thread as soon as it is submitted.
///
/// The first panicking task stops the run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Serial;

impl Serial {
    /// Creates the dispatcher.
    pub const fn new() -> Self {
        Self
    }
}

impl TaskDispatcher for Serial {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn run<I, T, R, F>(&self, items: I, task: F) -> Result<Vec<R>, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let mut results = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| task(item))) {
                Ok(result) => results.push(result),
                Err(payload) => {
                    return Err(DispatchError::TaskPanicked {
                        index,
                        message: panic_message(payload.as_ref()),
                    })
                }
            }
        }
        debug!(backend = self.name(), tasks = results.len(), "dispatch complete");
        Ok(results)
    }
}
