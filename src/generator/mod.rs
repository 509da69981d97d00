//! Candidate generation over a fixed alphabet.
//!
//! This module provides:
//! - `Alphabet`: the ordered symbol set candidates are built from
//! - `Task`: a candidate buffer plus the position range it owns
//! - `BruteMode`: recursive and iterative (odometer) enumeration strategies
//!
//! Both strategies visit the same combinations in the same lexicographic
//! order and stop as soon as the handler asks them to.

mod alphabet;
mod strategy;
mod task;

pub use alphabet::Alphabet;
pub use strategy::{brute_iterative, brute_recursive, BruteMode};
pub use task::Task;
