//! Enumeration strategies.

use std::str::FromStr;

use super::{Alphabet, Task};

/// How the generator walks the combinations of a task's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BruteMode {
    /// Depth-first, one stack frame per position
    Recursive,
    /// Flat odometer over per-position digit indices
    #[default]
    Iterative,
}

impl BruteMode {
    /// Fills `task.range()` with every combination over `alphabet`, calling
    /// `handler` once per combination.
    ///
    /// Returns `true` if the handler asked to stop.
    #[inline]
    pub fn run<F>(self, task: &mut Task, alphabet: &Alphabet, handler: &mut F) -> bool
    where
        F: FnMut(&Task) -> bool,
    {
        match self {
            BruteMode::Recursive => brute_recursive(task, alphabet, handler),
            BruteMode::Iterative => brute_iterative(task, alphabet, handler),
        }
    }
}

impl FromStr for BruteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recursive" | "rec" | "r" => Ok(BruteMode::Recursive),
            "iterative" | "iter" | "i" => Ok(BruteMode::Iterative),
            _ => Err(format!("Unknown brute mode: {}", s)),
        }
    }
}

impl std::fmt::Display for BruteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BruteMode::Recursive => write!(f, "recursive"),
            BruteMode::Iterative => write!(f, "iterative"),
        }
    }
}

/// Depth-first enumeration. Recursion depth equals the range width.
pub fn brute_recursive<F>(task: &mut Task, alphabet: &Alphabet, handler: &mut F) -> bool
where
    F: FnMut(&Task) -> bool,
{
    let from = task.from();
    fill(from, task, alphabet, handler)
}

fn fill<F>(position: usize, task: &mut Task, alphabet: &Alphabet, handler: &mut F) -> bool
where
    F: FnMut(&Task) -> bool,
{
    if position >= task.to() {
        return handler(task);
    }

    for &symbol in alphabet.symbols() {
        task.set(position, symbol);
        if fill(position + 1, task, alphabet, handler) {
            return true;
        }
    }

    false
}

/// Odometer enumeration: the rightmost position turns fastest and carries
/// into its left neighbour when it rolls past the last symbol.
pub fn brute_iterative<F>(task: &mut Task, alphabet: &Alphabet, handler: &mut F) -> bool
where
    F: FnMut(&Task) -> bool,
{
    let from = task.from();
    let last = alphabet.len() - 1;
    let mut digits = vec![0usize; task.to() - from];

    for position in task.range() {
        task.set(position, alphabet.first());
    }

    loop {
        if handler(task) {
            return true;
        }

        let mut digit = digits.len();
        loop {
            if digit == 0 {
                // Carry ran past `from`: every combination has been offered.
                return false;
            }
            digit -= 1;

            if digits[digit] < last {
                digits[digit] += 1;
                task.set(from + digit, alphabet.symbol(digits[digit]));
                break;
            }

            digits[digit] = 0;
            task.set(from + digit, alphabet.first());
        }
    }
}
