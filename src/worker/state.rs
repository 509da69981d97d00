//! State shared by the dispatcher and every worker for one search run.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::crypto::{Verifier, VerifyError};
use crate::generator::{Alphabet, Task};

/// Counters for one search run.
#[derive(Debug, Default)]
pub struct SearchStats {
    /// Candidates handed to the verifier
    pub candidates_checked: AtomicU64,
    /// Prefix tasks pushed into the queue
    pub tasks_published: AtomicU64,
    /// Tasks a worker finished with
    pub tasks_processed: AtomicU64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            candidates_checked: self.candidates_checked.load(Ordering::Relaxed),
            tasks_published: self.tasks_published.load(Ordering::Relaxed),
            tasks_processed: self.tasks_processed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of `SearchStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub candidates_checked: u64,
    pub tasks_published: u64,
    pub tasks_processed: u64,
}

/// Alphabet, target and verifier plus everything threads coordinate through:
/// the result slot, the halt flags and the live-task counter.
///
/// `halted` is raised by a match, a verifier failure or cancellation; the
/// generators poll it to stop early. `found` is raised only by a match.
pub struct SearchState {
    alphabet: Alphabet,
    target: String,
    verifier: Box<dyn Verifier>,
    found: AtomicBool,
    halted: AtomicBool,
    cancelled: AtomicBool,
    password: Mutex<Option<String>>,
    failure: Mutex<Option<VerifyError>>,
    /// Tasks created but not yet processed
    pending: Mutex<usize>,
    idle: Condvar,
    stats: SearchStats,
}

impl SearchState {
    pub fn new(alphabet: Alphabet, target: impl Into<String>, verifier: Box<dyn Verifier>) -> Self {
        Self {
            alphabet,
            target: target.into(),
            verifier,
            found: AtomicBool::new(false),
            halted: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            password: Mutex::new(None),
            failure: Mutex::new(None),
            pending: Mutex::new(0),
            idle: Condvar::new(),
            stats: SearchStats::new(),
        }
    }

    #[inline]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns true once a matching candidate has been recorded.
    #[inline]
    pub fn is_found(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// Returns true once the search should stop for any reason.
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Verify handler: checks the task's candidate and records a match.
    ///
    /// Returns true when the generator should stop, either because this
    /// candidate matched or because the search was already halted.
    pub fn verify_and_record(&self, task: &Task) -> bool {
        self.stats.candidates_checked.fetch_add(1, Ordering::Relaxed);

        match self.verifier.verify(task.candidate(), &self.target) {
            Ok(true) => {
                self.record_match(task.candidate_string());
                true
            }
            Ok(false) => self.should_stop(),
            Err(e) => {
                self.record_failure(e);
                true
            }
        }
    }

    /// Stores the matching password and halts the search.
    ///
    /// Later matches keep the first password.
    pub fn record_match(&self, password: String) {
        {
            let mut slot = lock(&self.password);
            if slot.is_none() {
                info!(password = %password, "match found");
                *slot = Some(password);
            }
        }
        self.found.store(true, Ordering::Release);
        self.halted.store(true, Ordering::Release);
    }

    /// Stores the first verifier failure and halts the search without a match.
    pub fn record_failure(&self, error: VerifyError) {
        {
            let mut slot = lock(&self.failure);
            if slot.is_none() {
                warn!(error = %error, "verifier failed, stopping search");
                *slot = Some(error);
            }
        }
        self.halted.store(true, Ordering::Release);
    }

    /// Halts the search cooperatively.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            warn!("search cancelled");
        }
        self.halted.store(true, Ordering::Release);
    }

    /// Registers a task about to be handed to the workers.
    pub fn register_task(&self) {
        *lock(&self.pending) += 1;
        self.stats.tasks_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Marks one registered task as processed, waking waiters at zero.
    pub fn complete_task(&self) {
        let mut pending = lock(&self.pending);
        debug_assert!(*pending > 0, "completed more tasks than were registered");
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    /// Number of registered tasks not yet processed.
    pub fn pending(&self) -> usize {
        *lock(&self.pending)
    }

    /// Blocks until every registered task has been processed.
    ///
    /// Returns immediately when no task is pending.
    pub fn wait_idle(&self) {
        let mut pending = lock(&self.pending);
        while *pending > 0 {
            pending = self
                .idle
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
        debug!("all tasks processed");
    }

    /// Returns the recorded password, if any.
    pub fn password(&self) -> Option<String> {
        lock(&self.password).clone()
    }

    /// Returns the recorded verifier failure, if any.
    pub fn failure(&self) -> Option<VerifyError> {
        lock(&self.failure).clone()
    }
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchState")
            .field("alphabet", &self.alphabet)
            .field("target", &self.target)
            .field("found", &self.is_found())
            .field("halted", &self.should_stop())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Locks a mutex, ignoring poisoning; every guarded value stays consistent
/// across a panicking holder.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
