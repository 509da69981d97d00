//! CPU worker that checks the suffixes of queued prefix tasks.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::generator::{BruteMode, Task};

use super::{SearchState, TaskReceiver};

/// A worker that pops prefix tasks and verifies every suffix of each.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Strategy used to enumerate suffixes
    brute_mode: BruteMode,
    /// Positions appended to each prefix
    suffix_width: usize,
    /// Source of prefix tasks
    queue: TaskReceiver,
    /// State shared with the dispatcher and the other workers
    state: Arc<SearchState>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        brute_mode: BruteMode,
        suffix_width: usize,
        queue: TaskReceiver,
        state: Arc<SearchState>,
    ) -> Self {
        Self {
            id,
            brute_mode,
            suffix_width,
            queue,
            state,
        }
    }

    /// Runs the worker loop until the queue is closed and drained.
    ///
    /// Every popped task is completed exactly once, including after the
    /// search has been halted, so the dispatcher's wait always ends.
    pub fn run(&self) {
        debug!(worker = self.id, "worker started");

        while let Some(task) = self.queue.pop() {
            self.process(task);
        }

        debug!(worker = self.id, "worker exiting");
    }

    fn process(&self, task: Task) {
        let _completion = Completion(&self.state);

        if self.state.should_stop() {
            return;
        }

        let mut task = task.into_suffix(self.suffix_width);
        trace!(
            worker = self.id,
            from = task.from(),
            to = task.to(),
            "processing task"
        );

        let state = &*self.state;
        self.brute_mode
            .run(&mut task, state.alphabet(), &mut |t: &Task| state.verify_and_record(t));
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Completes the current task when dropped, even if verification panics.
struct Completion<'a>(&'a SearchState);

impl Drop for Completion<'_> {
    fn drop(&mut self) {
        self.0.stats().tasks_processed.fetch_add(1, Ordering::Relaxed);
        self.0.complete_task();
    }
}
