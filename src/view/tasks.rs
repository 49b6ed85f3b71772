//! Cancellable delayed tasks tied to a view's lifetime
//!
//! A view that wants to do something "in two seconds" (redirect after a
//! successful submit, hide a success banner) schedules it on its
//! [`TaskScope`]. When the view is torn down the scope is dropped and every
//! pending task is aborted, so nothing fires against a view that no longer
//! exists.

use std::time::Duration;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tracing::debug;

/// A delayed action running on the tokio runtime.
///
/// Dropping the task aborts it if it has not fired yet.
#[derive(Debug)]
pub struct ScheduledTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `action` after `delay` on the current runtime
    pub fn after<F>(name: &'static str, delay: Duration, action: F) -> Result<Self, TryCurrentError>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = Handle::try_current()?;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Ok(Self { name, handle })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Abort the task if it has not fired yet
    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            debug!(task = self.name, "cancelling scheduled task");
            self.handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Owner of a view's scheduled tasks
#[derive(Debug, Default)]
pub struct TaskScope {
    tasks: Vec<ScheduledTask>,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` after `delay`.
    ///
    /// Tasks with the same name replace (and cancel) the previous one.
    pub fn schedule<F>(
        &mut self,
        name: &'static str,
        delay: Duration,
        action: F,
    ) -> Result<(), TryCurrentError>
    where
        F: FnOnce() + Send + 'static,
    {
        let task = ScheduledTask::after(name, delay, action)?;
        self.tasks.retain(|t| t.name() != name && !t.is_finished());
        self.tasks.push(task);
        Ok(())
    }

    /// Number of tasks that have not fired or been cancelled
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Abort every pending task (view teardown)
    pub fn cancel_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.cancel();
        }
    }
}
