//! Worker pool management.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::config::SearchParams;
use crate::error::Error;
use crate::generator::Task;

use super::cpu::CpuWorker;
use super::queue::{task_queue, QueueClosed, TaskSender};
use super::SearchState;

/// A fixed set of worker threads draining one bounded task queue.
///
/// Dropping or joining the pool closes the queue; workers finish the tasks
/// still queued and exit.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Pushing side of the queue; dropped to close it
    queue: Option<TaskSender>,
}

impl WorkerPool {
    /// Starts `params.workers` workers over a queue of `params.queue_capacity`.
    ///
    /// If a thread cannot be spawned, the workers already started are shut
    /// down and joined before the error is returned.
    pub fn new(params: &SearchParams, state: Arc<SearchState>) -> Result<Self, Error> {
        let (queue, receiver) = task_queue(params.queue_capacity);
        let mut handles = Vec::with_capacity(params.workers);

        for id in 0..params.workers {
            let worker = CpuWorker::new(
                id,
                params.brute_mode,
                params.suffix_width,
                receiver.clone(),
                state.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("brute-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!(worker = id, error = %e, "failed to spawn worker");
                    drop(queue);
                    join_all(handles);
                    return Err(Error::Spawn(e));
                }
            }
        }

        debug!(workers = params.workers, capacity = params.queue_capacity, "worker pool started");

        Ok(Self {
            num_workers: params.workers,
            handles: Some(handles),
            queue: Some(queue),
        })
    }

    /// Enqueues a task, blocking while the queue is full.
    pub fn submit(&self, task: Task) -> Result<(), QueueClosed> {
        match &self.queue {
            Some(queue) => queue.push(task),
            None => Err(QueueClosed),
        }
    }

    /// Closes the queue and waits for all workers to exit.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.queue.take();
        if let Some(handles) = self.handles.take() {
            join_all(handles);
            debug!("worker pool stopped");
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            warn!("worker thread panicked");
        }
    }
}
