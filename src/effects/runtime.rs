//! Scheduler backed by the tokio timer.

use crate::effects::scheduler::{Callback, Scheduler, TimerHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Errors that can occur when creating a runtime scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("No tokio runtime is running on this thread")]
    NoRuntime,
}

#[derive(Default)]
struct TaskSet {
    next_id: u64,
    tasks: HashMap<u64, JoinHandle<()>>,
}

/// Scheduler that sleeps on a tokio task per callback.
///
/// Cancelling aborts the sleeping task. Clones share one task set.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
    tasks: Arc<Mutex<TaskSet>>,
}

impl TokioScheduler {
    /// Schedule onto the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Arc::default(),
        }
    }

    /// Schedule onto the runtime the caller is running in.
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SchedulerError::NoRuntime)
    }

    /// Number of callbacks that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.tasks.lock().tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> TimerHandle {
        // Held across spawn so the task cannot deregister before it is registered.
        let mut set = self.tasks.lock();
        let id = set.next_id;
        set.next_id += 1;

        let tasks = Arc::clone(&self.tasks);
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tasks.lock().tasks.remove(&id);
            callback();
        });
        set.tasks.insert(id, task);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let task = self.tasks.lock().tasks.remove(&handle.id());
        if let Some(task) = task {
            task.abort();
        }
    }
}
