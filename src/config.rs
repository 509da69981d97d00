//! Runtime configuration for the password search.

use std::ops::RangeInclusive;
use std::str::FromStr;

use clap::Parser;

use crate::generator::{Alphabet, BruteMode};

/// Positions each worker task enumerates after its prefix.
pub const DEFAULT_SUFFIX_WIDTH: usize = 2;

/// Slots in the task queue between the dispatcher and the workers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 7;

/// Hash Brute-Force Search
///
/// Enumerates every password over an alphabet and reports the one whose
/// hash equals the target.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Target hash: crypt(3) string (e.g. DES "abg3r/JgoFqCQ") or [keccak256:|sha3-256:]<hex>
    pub hash: String,

    /// Alphabet to build candidates from
    #[arg(short, long, default_value = "abc")]
    pub alphabet: String,

    /// Password length
    #[arg(short = 'n', long, default_value = "4")]
    pub length: usize,

    /// Use the iterative (odometer) generator (default)
    #[arg(short = 'i', long, conflicts_with = "recursive")]
    pub iterative: bool,

    /// Use the recursive generator
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Search on the calling thread only (default)
    #[arg(short = 's', long, conflicts_with = "multi")]
    pub single: bool,

    /// Search with a worker pool
    #[arg(short = 'm', long)]
    pub multi: bool,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Lengths to search: exact (only --length) or up-to (0..=--length)
    #[arg(short = 'l', long, default_value = "exact")]
    pub length_mode: LengthMode,

    /// Positions enumerated by each worker task
    #[arg(long, default_value_t = DEFAULT_SUFFIX_WIDTH)]
    pub suffix_width: usize,

    /// Task queue capacity
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn brute_mode(&self) -> BruteMode {
        if self.recursive {
            BruteMode::Recursive
        } else {
            BruteMode::Iterative
        }
    }

    pub fn thread_mode(&self) -> ThreadMode {
        if self.multi {
            ThreadMode::Multi
        } else {
            ThreadMode::Single
        }
    }

    /// Builds and validates the search parameters.
    pub fn search_params(&self) -> Result<SearchParams, ConfigError> {
        if self.workers == Some(0) {
            return Err(ConfigError::NoWorkers);
        }

        let params = SearchParams::new(Alphabet::new(&self.alphabet)?, self.length, &self.hash)
            .with_brute_mode(self.brute_mode())
            .with_thread_mode(self.thread_mode())
            .with_length_mode(self.length_mode)
            .with_workers(self.worker_count())
            .with_suffix_width(self.suffix_width)
            .with_queue_capacity(self.queue_capacity);

        params.validate()?;
        Ok(params)
    }
}

/// Where candidates are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadMode {
    /// Everything on the calling thread
    #[default]
    Single,
    /// Dispatcher publishes prefixes, a worker pool checks suffixes
    Multi,
}

impl FromStr for ThreadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "s" => Ok(ThreadMode::Single),
            "multi" | "m" => Ok(ThreadMode::Multi),
            _ => Err(format!("Unknown thread mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ThreadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadMode::Single => write!(f, "single"),
            ThreadMode::Multi => write!(f, "multi"),
        }
    }
}

/// Which candidate lengths a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthMode {
    /// Only the configured length
    #[default]
    Exact,
    /// Every length from 0 to the configured length
    UpTo,
}

impl FromStr for LengthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "fixed" => Ok(LengthMode::Exact),
            "up-to" | "upto" | "all" => Ok(LengthMode::UpTo),
            _ => Err(format!("Unknown length mode: {}", s)),
        }
    }
}

impl std::fmt::Display for LengthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LengthMode::Exact => write!(f, "exact"),
            LengthMode::UpTo => write!(f, "up-to"),
        }
    }
}

/// Validated inputs of one search run.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub alphabet: Alphabet,
    pub password_length: usize,
    pub target: String,
    pub brute_mode: BruteMode,
    pub thread_mode: ThreadMode,
    pub length_mode: LengthMode,
    pub workers: usize,
    pub suffix_width: usize,
    pub queue_capacity: usize,
}

impl SearchParams {
    /// Creates parameters with default modes, widths and worker count.
    pub fn new(alphabet: Alphabet, password_length: usize, target: impl Into<String>) -> Self {
        Self {
            alphabet,
            password_length,
            target: target.into(),
            brute_mode: BruteMode::default(),
            thread_mode: ThreadMode::default(),
            length_mode: LengthMode::default(),
            workers: num_cpus::get().max(1),
            suffix_width: DEFAULT_SUFFIX_WIDTH,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_brute_mode(mut self, brute_mode: BruteMode) -> Self {
        self.brute_mode = brute_mode;
        self
    }

    pub fn with_thread_mode(mut self, thread_mode: ThreadMode) -> Self {
        self.thread_mode = thread_mode;
        self
    }

    pub fn with_length_mode(mut self, length_mode: LengthMode) -> Self {
        self.length_mode = length_mode;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_suffix_width(mut self, suffix_width: usize) -> Self {
        self.suffix_width = suffix_width;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    /// Validates the parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        if self.password_length == 0 {
            return Err(ConfigError::InvalidLength(
                "Password length must be at least 1".into(),
            ));
        }

        if self.thread_mode == ThreadMode::Multi {
            if self.workers == 0 {
                return Err(ConfigError::NoWorkers);
            }
            if self.suffix_width == 0 {
                return Err(ConfigError::InvalidLength(
                    "Suffix width must be at least 1".into(),
                ));
            }
            if self.password_length < self.suffix_width {
                return Err(ConfigError::LengthBelowSuffixWidth {
                    length: self.password_length,
                    width: self.suffix_width,
                });
            }
            if self.queue_capacity == 0 {
                return Err(ConfigError::InvalidQueueCapacity);
            }
        }

        Ok(())
    }

    /// Candidate lengths covered when searching on a single thread.
    pub fn candidate_lengths(&self) -> RangeInclusive<usize> {
        match self.length_mode {
            LengthMode::Exact => self.password_length..=self.password_length,
            LengthMode::UpTo => 0..=self.password_length,
        }
    }

    /// Prefix lengths the dispatcher publishes in multi-threaded mode.
    ///
    /// Only meaningful once `validate` has accepted the parameters.
    pub fn prefix_lengths(&self) -> RangeInclusive<usize> {
        let cutoff = self.password_length - self.suffix_width;
        match self.length_mode {
            LengthMode::Exact => cutoff..=cutoff,
            LengthMode::UpTo => 0..=cutoff,
        }
    }

    /// Total candidates the search covers if nothing matches.
    pub fn search_space(&self) -> u64 {
        self.candidate_lengths()
            .map(|length| self.alphabet.combinations(length))
            .fold(0u64, u64::saturating_add)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Alphabet cannot be empty")]
    EmptyAlphabet,

    #[error("Alphabet symbol {0:?} is not a printable ASCII character")]
    InvalidSymbol(char),

    #[error("Alphabet symbol {0:?} appears more than once")]
    DuplicateSymbol(char),

    #[error("Invalid length: {0}")]
    InvalidLength(String),

    #[error("Password length {length} is shorter than the suffix width {width}")]
    LengthBelowSuffixWidth { length: usize, width: usize },

    #[error("Queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("Worker count must be at least 1")]
    NoWorkers,
}
