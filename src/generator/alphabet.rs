//! Alphabet representation.

use std::fmt;

use crate::config::ConfigError;

/// An ordered, non-empty set of distinct ASCII symbols.
///
/// Enumeration order follows the order the symbols were given in, so
/// `"ba"` enumerates `b` before `a`.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet(Vec<u8>);

impl Alphabet {
    /// Builds an alphabet from a string of symbols.
    pub fn new(symbols: &str) -> Result<Self, ConfigError> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        let mut bytes = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if !c.is_ascii() || c.is_ascii_control() {
                return Err(ConfigError::InvalidSymbol(c));
            }
            let b = c as u8;
            if bytes.contains(&b) {
                return Err(ConfigError::DuplicateSymbol(c));
            }
            bytes.push(b);
        }

        Ok(Self(bytes))
    }

    /// Returns the symbols in enumeration order.
    #[inline]
    pub fn symbols(&self) -> &[u8] {
        &self.0
    }

    /// Returns the symbol at `index`.
    #[inline]
    pub fn symbol(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// Returns the first symbol (the odometer's zero digit).
    #[inline]
    pub fn first(&self) -> u8 {
        self.0[0]
    }

    /// Number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; construction rejects empty alphabets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct candidates of the given length (saturating).
    pub fn combinations(&self, length: usize) -> u64 {
        (self.0.len() as u64).saturating_pow(length.min(u32::MAX as usize) as u32)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet({:?})", self.to_string())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_alphabet() {
        let alphabet = Alphabet::new("abc").unwrap();
        assert_eq!(alphabet.symbols(), b"abc");
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.first(), b'a');
        assert_eq!(alphabet.to_string(), "abc");
    }

    #[test]
    fn test_empty_alphabet() {
        assert!(matches!(Alphabet::new(""), Err(ConfigError::EmptyAlphabet)));
    }

    #[test]
    fn test_duplicate_symbol() {
        assert!(matches!(
            Alphabet::new("abca"),
            Err(ConfigError::DuplicateSymbol('a'))
        ));
    }

    #[test]
    fn test_non_ascii_symbol() {
        assert!(matches!(
            Alphabet::new("aé"),
            Err(ConfigError::InvalidSymbol('é'))
        ));
    }

    #[test]
    fn test_combinations() {
        let alphabet = Alphabet::new("abc").unwrap();
        assert_eq!(alphabet.combinations(0), 1);
        assert_eq!(alphabet.combinations(4), 81);
    }
}
