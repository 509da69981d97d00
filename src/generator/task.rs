//! Units of work handed between the dispatcher and the workers.

use std::ops::Range;

/// A candidate buffer and the half-open position range `[from, to)` it owns.
///
/// Positions before `from` hold an inherited prefix. Positions in
/// `[from, to)` are free for the generator to fill. The candidate seen by a
/// handler is `buffer[..to]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    password: Vec<u8>,
    from: usize,
    to: usize,
}

impl Task {
    /// Creates a task over a zeroed buffer of `capacity` bytes.
    ///
    /// # Panics
    /// Panics if `from > to` or `to > capacity`.
    pub(crate) fn new(capacity: usize, from: usize, to: usize) -> Self {
        assert!(
            from <= to && to <= capacity,
            "invalid task range {}..{} for capacity {}",
            from,
            to,
            capacity
        );
        Self {
            password: vec![0; capacity],
            from,
            to,
        }
    }

    /// First position this task enumerates.
    #[inline]
    pub fn from(&self) -> usize {
        self.from
    }

    /// One past the last position this task enumerates.
    #[inline]
    pub fn to(&self) -> usize {
        self.to
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    /// Size of the underlying buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.password.len()
    }

    /// The candidate as currently filled: every position before `to`.
    #[inline]
    pub fn candidate(&self) -> &[u8] {
        &self.password[..self.to]
    }

    pub fn candidate_string(&self) -> String {
        String::from_utf8_lossy(self.candidate()).into_owned()
    }

    /// Turns a prefix task into the suffix task a worker enumerates:
    /// the old range becomes fixed and `[to, to + width)` becomes free.
    ///
    /// # Panics
    /// Panics if the suffix would run past the buffer.
    pub(crate) fn into_suffix(mut self, width: usize) -> Self {
        let to = self.to + width;
        assert!(
            to <= self.password.len(),
            "suffix {}..{} exceeds capacity {}",
            self.to,
            to,
            self.password.len()
        );
        self.from = self.to;
        self.to = to;
        self
    }

    #[inline]
    pub(crate) fn set(&mut self, position: usize, symbol: u8) {
        self.password[position] = symbol;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_is_prefix_of_buffer() {
        let mut task = Task::new(4, 0, 2);
        task.set(0, b'a');
        task.set(1, b'b');
        task.set(2, b'c');
        assert_eq!(task.candidate(), b"ab");
        assert_eq!(task.candidate_string(), "ab");
        assert_eq!(task.capacity(), 4);
    }

    #[test]
    fn test_into_suffix() {
        let mut task = Task::new(4, 0, 2);
        task.set(0, b'x');
        task.set(1, b'y');
        let task = task.into_suffix(2);
        assert_eq!(task.range(), 2..4);
        assert_eq!(&task.candidate()[..2], b"xy");
    }

    #[test]
    #[should_panic]
    fn test_into_suffix_overflow() {
        let _ = Task::new(3, 0, 2).into_suffix(2);
    }

    #[test]
    #[should_panic]
    fn test_invalid_range() {
        let _ = Task::new(2, 0, 3);
    }
}
