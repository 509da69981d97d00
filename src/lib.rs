//! # hash_brute
//!
//! Exhaustive password search against a target hash.
//!
//! ## Architecture
//!
//! - `generator`: Alphabet, tasks and the recursive / iterative enumerators
//! - `crypto`: Digests, crypt(3), target parsing and the `Verifier` capability
//! - `worker`: Bounded task queue, shared search state and the worker pool
//! - `search`: Single-threaded and multi-threaded dispatch
//! - `config`: Command-line and search configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod generator;
pub mod search;
pub mod worker;

pub use config::{Config, ConfigError, LengthMode, SearchParams, ThreadMode};
pub use crypto::{
    digest_hex, CryptVerifier, DigestVerifier, HashAlgorithm, TargetHash, TargetVerifier, Verifier,
    VerifyError,
};
pub use error::Error;
pub use generator::{Alphabet, BruteMode, Task};
pub use search::{run, CancelHandle, Search, SearchOutcome};
pub use worker::{SearchState, StatsSnapshot, WorkerPool};
