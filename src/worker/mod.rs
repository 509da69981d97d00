//! Worker pool for parallel candidate verification.
//!
//! This module provides:
//! - A bounded task queue between the dispatcher and the workers
//! - Shared search state (result slot, halt flags, live-task counter)
//! - Multi-threaded CPU workers and the pool that owns them

mod cpu;
mod pool;
mod queue;
mod state;

pub use cpu::CpuWorker;
pub use pool::WorkerPool;
pub use queue::{task_queue, QueueClosed, TaskReceiver, TaskSender};
pub use state::{SearchState, SearchStats, StatsSnapshot};
