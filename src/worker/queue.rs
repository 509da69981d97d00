//! Bounded task queue between the dispatcher and the workers.
//!
//! A capacity-limited channel split into a pushing and a popping handle.
//! Pushes block while the queue is full and pops block while it is empty.
//! Dropping every `TaskSender` closes the queue: poppers drain what is left
//! and then see `None`.

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::generator::Task;

/// Returned by `TaskSender::push` when no popper is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("task queue closed")]
pub struct QueueClosed;

/// Creates a queue holding at most `capacity` tasks.
///
/// # Panics
/// Panics if `capacity` is zero.
pub fn task_queue(capacity: usize) -> (TaskSender, TaskReceiver) {
    assert!(capacity > 0, "task queue capacity must be at least 1");
    let (tx, rx) = bounded(capacity);
    (TaskSender { tx }, TaskReceiver { rx })
}

/// Pushing side of the task queue.
#[derive(Debug, Clone)]
pub struct TaskSender {
    tx: Sender<Task>,
}

impl TaskSender {
    /// Blocks until a slot is free, then enqueues `task`.
    pub fn push(&self, task: Task) -> Result<(), QueueClosed> {
        self.tx.send(task).map_err(|_| QueueClosed)
    }

    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(0)
    }
}

/// Popping side of the task queue.
#[derive(Debug, Clone)]
pub struct TaskReceiver {
    rx: Receiver<Task>,
}

impl TaskReceiver {
    /// Blocks until a task is available.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<Task> {
        self.rx.recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.rx.capacity().unwrap_or(0)
    }
}
