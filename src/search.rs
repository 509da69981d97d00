//! Search dispatcher: single-threaded verification or prefix publishing to
//! a worker pool.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::{LengthMode, SearchParams, ThreadMode};
use crate::crypto::Verifier;
use crate::error::Error;
use crate::generator::Task;
use crate::worker::{SearchState, StatsSnapshot, WorkerPool};

/// Final result of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The matching password, if one was found
    pub password: Option<String>,
    /// True if the run was cancelled before it could finish
    pub cancelled: bool,
    /// Counters at the end of the run
    pub stats: StatsSnapshot,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        self.password.is_some()
    }

    /// Candidates checked per second.
    pub fn candidates_per_second(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.stats.candidates_checked as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Halts a running search from another thread (e.g. a signal handler).
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<SearchState>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.cancel();
    }
}

/// One exhaustive search run.
#[derive(Debug)]
pub struct Search {
    params: SearchParams,
    state: Arc<SearchState>,
}

impl Search {
    /// Validates `params` and prepares the shared state.
    ///
    /// Nothing is spawned until `run`.
    pub fn new(params: SearchParams, verifier: impl Verifier + 'static) -> Result<Self, Error> {
        params.validate()?;
        let state = Arc::new(SearchState::new(
            params.alphabet.clone(),
            params.target.clone(),
            Box::new(verifier),
        ));
        Ok(Self { params, state })
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(self.state.clone())
    }

    /// Runs the search to completion, a match, a verifier failure or
    /// cancellation.
    pub fn run(self) -> Result<SearchOutcome, Error> {
        let start = Instant::now();
        info!(
            alphabet = %self.params.alphabet,
            length = self.params.password_length,
            brute_mode = %self.params.brute_mode,
            thread_mode = %self.params.thread_mode,
            length_mode = %self.params.length_mode,
            "starting search"
        );

        match self.params.thread_mode {
            ThreadMode::Single => self.run_single(),
            ThreadMode::Multi => self.run_multi()?,
        }

        if let Some(e) = self.state.failure() {
            return Err(Error::Verify(e));
        }

        let password = self.state.password();
        let outcome = SearchOutcome {
            cancelled: password.is_none() && self.state.is_cancelled(),
            password,
            stats: self.state.stats().snapshot(),
            elapsed: start.elapsed(),
        };

        info!(
            found = outcome.is_found(),
            candidates = outcome.stats.candidates_checked,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "search finished"
        );

        Ok(outcome)
    }

    /// Verifies every candidate on the calling thread.
    fn run_single(&self) {
        for length in self.params.candidate_lengths() {
            if self.verify_inline(length) {
                break;
            }
        }
    }

    /// Enumerates every candidate of `length` on the calling thread.
    ///
    /// Returns true if the search was halted.
    fn verify_inline(&self, length: usize) -> bool {
        let state = &*self.state;
        let mut task = Task::new(self.params.password_length, 0, length);
        self.params
            .brute_mode
            .run(&mut task, state.alphabet(), &mut |t: &Task| state.verify_and_record(t))
    }

    /// Publishes prefixes to a worker pool and waits until every published
    /// task has been processed.
    fn run_multi(&self) -> Result<(), Error> {
        let state = &*self.state;
        let pool = WorkerPool::new(&self.params, self.state.clone())?;

        // No prefix task yields candidates shorter than the suffix width.
        if self.params.length_mode == LengthMode::UpTo {
            for length in 0..self.params.suffix_width {
                if self.verify_inline(length) {
                    break;
                }
            }
        }

        let mut closed = false;
        for to in self.params.prefix_lengths() {
            if state.should_stop() {
                break;
            }
            debug!(prefix_length = to, "publishing prefixes");

            let mut task = Task::new(self.params.password_length, 0, to);
            let stopped = self.params.brute_mode.run(
                &mut task,
                state.alphabet(),
                &mut |prefix: &Task| {
                    state.register_task();
                    if pool.submit(prefix.clone()).is_err() {
                        state.complete_task();
                        closed = true;
                        return true;
                    }
                    state.should_stop()
                },
            );
            if stopped {
                break;
            }
        }

        debug!(pending = state.pending(), "waiting for workers");
        state.wait_idle();
        pool.join();

        if closed {
            return Err(Error::QueueClosed);
        }
        Ok(())
    }
}

/// Runs a search with `params` and `verifier` in one call.
pub fn run(params: SearchParams, verifier: impl Verifier + 'static) -> Result<SearchOutcome, Error> {
    Search::new(params, verifier)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::config::ConfigError;
    use crate::crypto::{digest_hex, DigestVerifier, HashAlgorithm, TargetVerifier, VerifyError};
    use crate::generator::{Alphabet, BruteMode};

    const MODES: [BruteMode; 2] = [BruteMode::Recursive, BruteMode::Iterative];

    fn target_of(password: &str) -> String {
        digest_hex(HashAlgorithm::Keccak256, password.as_bytes())
    }

    fn make_params(alphabet: &str, length: usize, target: &str) -> SearchParams {
        SearchParams::new(Alphabet::new(alphabet).unwrap(), length, target)
    }

    fn multi(params: SearchParams, workers: usize) -> SearchParams {
        params.with_thread_mode(ThreadMode::Multi).with_workers(workers)
    }

    #[test]
    fn test_single_finds_password() {
        for mode in MODES {
            let params = make_params("ab", 2, &target_of("ba")).with_brute_mode(mode);
            let outcome = run(params, DigestVerifier::new()).unwrap();
            assert_eq!(outcome.password.as_deref(), Some("ba"), "{}", mode);
            assert!(!outcome.cancelled);
            // aa ab ba
            assert_eq!(outcome.stats.candidates_checked, 3);
        }
    }

    #[test]
    fn test_exhaustive_not_found() {
        let target = target_of("abc");
        for mode in MODES {
            let single = make_params("ab", 3, &target).with_brute_mode(mode);
            let outcome = run(single.clone(), DigestVerifier::new()).unwrap();
            assert!(!outcome.is_found());
            assert_eq!(outcome.stats.candidates_checked, 8);

            let outcome = run(multi(single, 3), DigestVerifier::new()).unwrap();
            assert!(!outcome.is_found());
            assert!(!outcome.cancelled);
            assert_eq!(outcome.stats.candidates_checked, 8);
            assert_eq!(outcome.stats.tasks_published, 2);
            assert_eq!(outcome.stats.tasks_processed, 2);
        }
    }

    #[test]
    fn test_multi_task_partitioning() {
        for mode in MODES {
            let params = multi(make_params("abc", 4, &target_of("none")), 4)
                .with_brute_mode(mode)
                .with_suffix_width(2);
            let outcome = run(params, DigestVerifier::new()).unwrap();
            assert!(!outcome.is_found());
            assert_eq!(outcome.stats.tasks_published, 9);
            assert_eq!(outcome.stats.tasks_processed, 9);
            assert_eq!(outcome.stats.candidates_checked, 81);
        }
    }

    #[test]
    fn test_multi_finds_password() {
        for mode in MODES {
            for workers in [1, 2, 8] {
                let params = multi(make_params("abc", 4, &target_of("cabb")), workers)
                    .with_brute_mode(mode);
                let outcome = run(params, DigestVerifier::new()).unwrap();
                assert_eq!(outcome.password.as_deref(), Some("cabb"));
                // Every published task was still processed.
                assert_eq!(outcome.stats.tasks_published, outcome.stats.tasks_processed);
            }
        }
    }

    #[test]
    fn test_multi_suffix_covers_whole_password() {
        let params = multi(make_params("xyz", 2, &target_of("zx")), 2);
        let outcome = run(params, DigestVerifier::new()).unwrap();
        assert_eq!(outcome.password.as_deref(), Some("zx"));
        // A single empty prefix task enumerates the whole password.
        assert_eq!(outcome.stats.tasks_published, 1);
    }

    #[test]
    fn test_single_and_multi_agree() {
        for password in ["aaaa", "abca", "cccc", "bacb"] {
            let target = target_of(password);
            let single = run(make_params("abc", 4, &target), DigestVerifier::new()).unwrap();
            let parallel =
                run(multi(make_params("abc", 4, &target), 3), DigestVerifier::new()).unwrap();
            assert_eq!(single.password, parallel.password);
            assert_eq!(single.password.as_deref(), Some(password));
        }
    }

    #[test]
    fn test_up_to_mode_finds_shorter_passwords() {
        for password in ["", "b", "ab", "bab"] {
            let target = target_of(password);
            let single = make_params("ab", 3, &target).with_length_mode(LengthMode::UpTo);
            let outcome = run(single.clone(), DigestVerifier::new()).unwrap();
            assert_eq!(outcome.password.as_deref(), Some(password));

            let outcome = run(multi(single, 2), DigestVerifier::new()).unwrap();
            assert_eq!(outcome.password.as_deref(), Some(password));
        }
    }

    #[test]
    fn test_up_to_mode_exhaustive_counts() {
        let params = multi(make_params("ab", 3, &target_of("none")), 2)
            .with_length_mode(LengthMode::UpTo)
            .with_suffix_width(2);
        let outcome = run(params, DigestVerifier::new()).unwrap();
        assert!(!outcome.is_found());
        // 1 + 2 + 4 + 8 candidates; prefixes of length 0 and 1 become tasks.
        assert_eq!(outcome.stats.candidates_checked, 15);
        assert_eq!(outcome.stats.tasks_published, 3);
    }

    #[test]
    fn test_des_crypt_target_found() {
        // crypt(3) DES of "ba" with salt "ab"
        let target = "abg3r/JgoFqCQ";
        for mode in MODES {
            let single = make_params("ab", 2, target).with_brute_mode(mode);
            let outcome = run(single.clone(), TargetVerifier::for_target(target)).unwrap();
            assert_eq!(outcome.password.as_deref(), Some("ba"));
            assert_eq!(outcome.stats.candidates_checked, 3);

            let outcome = run(multi(single, 2), TargetVerifier::for_target(target)).unwrap();
            assert_eq!(outcome.password.as_deref(), Some("ba"));
        }
    }

    #[test]
    fn test_digest_target_via_target_verifier() {
        let target = target_of("cab");
        let params = multi(make_params("abc", 3, &target), 2);
        let outcome = run(params, TargetVerifier::for_target(&target)).unwrap();
        assert_eq!(outcome.password.as_deref(), Some("cab"));
    }

    #[test]
    fn test_length_below_suffix_width_fails_fast() {
        let params = multi(make_params("ab", 1, &target_of("a")), 2);
        assert!(matches!(
            Search::new(params, DigestVerifier::new()),
            Err(Error::Config(ConfigError::LengthBelowSuffixWidth { .. }))
        ));
    }

    #[test]
    fn test_verifier_failure_propagates() {
        for params in [
            make_params("ab", 3, "not-a-hash"),
            multi(make_params("ab", 3, "not-a-hash"), 2),
        ] {
            match run(params, DigestVerifier::new()) {
                Err(Error::Verify(VerifyError::MalformedTarget(_))) => {}
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[test]
    fn test_verifier_failure_stops_early() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let verifier = move |_: &[u8], _: &str| -> Result<bool, VerifyError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(VerifyError::MalformedTarget("boom".into()))
        };

        let params = multi(make_params("abcdef", 5, "x"), 4);
        assert!(matches!(run(params, verifier), Err(Error::Verify(_))));
        // Each worker may fail at most once per task it had already started.
        assert!(calls.load(Ordering::SeqCst) < 6usize.pow(5));
    }

    #[test]
    fn test_cancelled_before_run() {
        for params in [
            make_params("abc", 4, &target_of("none")),
            multi(make_params("abc", 4, &target_of("none")), 2),
        ] {
            let search = Search::new(params, DigestVerifier::new()).unwrap();
            search.cancel_handle().cancel();
            let outcome = search.run().unwrap();
            assert!(outcome.cancelled);
            assert!(!outcome.is_found());
            assert!(outcome.stats.candidates_checked <= 1);
        }
    }

    #[test]
    fn test_early_stop_bounds_work() {
        // "aaaaaa" is the first candidate; the rest of 4^6 should be skipped.
        let params = multi(make_params("abcd", 6, &target_of("aaaaaa")), 2).with_queue_capacity(2);
        let outcome = run(params, DigestVerifier::new()).unwrap();
        assert_eq!(outcome.password.as_deref(), Some("aaaaaa"));
        assert!(outcome.stats.candidates_checked < 4u64.pow(6));
        assert_eq!(outcome.stats.tasks_published, outcome.stats.tasks_processed);
    }
}
