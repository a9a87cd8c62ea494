//! Next-frame task queue
//!
//! Any thread may queue work; the GameFrame hook drains the queue on the main
//! thread before timers run.

use std::sync::LazyLock;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use thiserror::Error;

/// A task to execute on the main thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Capacity of the task queue per frame
const QUEUE_CAPACITY: usize = 1024;

/// Reasons a task could not be queued
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    #[error("task queue is full")]
    Full,
    #[error("task queue is disconnected")]
    Disconnected,
}

/// Task queue channels
struct TaskQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
}

static TASK_QUEUE: LazyLock<TaskQueue> = LazyLock::new(|| {
    let (sender, receiver) = bounded(QUEUE_CAPACITY);
    TaskQueue { sender, receiver }
});

/// Queue a task to execute on the next game frame
///
/// The task is dropped when the queue is full.
#[tracing::instrument(skip(task))]
pub fn queue_task<F>(task: F) -> Result<(), TaskError>
where
    F: FnOnce() + Send + 'static,
{
    match TASK_QUEUE.sender.try_send(Box::new(task)) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => {
            tracing::warn!("Task queue full, dropping task");
            Err(TaskError::Full)
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!("Task queue disconnected");
            Err(TaskError::Disconnected)
        }
    }
}

/// Process queued tasks
///
/// Called from the GameFrame hook on the main thread. Tasks queued while
/// draining run in the same frame, up to `QUEUE_CAPACITY` in total.
/// Returns the number of tasks processed.
pub fn process_queued_tasks() -> usize {
    let mut count = 0;

    while count < QUEUE_CAPACITY {
        let Ok(task) = TASK_QUEUE.receiver.try_recv() else {
            break;
        };
        task();
        count += 1;
    }

    count
}

/// Drop every queued task without running it
///
/// Returns the number of tasks dropped.
pub fn clear_queued_tasks() -> usize {
    TASK_QUEUE.receiver.try_iter().count()
}
