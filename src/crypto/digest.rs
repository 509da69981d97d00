//! Digest algorithms and target hash representation.

use std::fmt;
use std::str::FromStr;

use tiny_keccak::{Hasher, Keccak, Sha3};

use super::VerifyError;

/// Digest length in bytes for every supported algorithm.
pub const DIGEST_LEN: usize = 32;

/// Hash function a target was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// Pre-standard Keccak-256 (Ethereum flavour)
    #[default]
    Keccak256,
    /// FIPS 202 SHA3-256
    Sha3_256,
}

impl HashAlgorithm {
    /// Hashes `input` with this algorithm.
    #[inline]
    pub fn digest(self, input: &[u8]) -> [u8; DIGEST_LEN] {
        let mut out = [0u8; DIGEST_LEN];
        match self {
            HashAlgorithm::Keccak256 => {
                let mut hasher = Keccak::v256();
                hasher.update(input);
                hasher.finalize(&mut out);
            }
            HashAlgorithm::Sha3_256 => {
                let mut hasher = Sha3::v256();
                hasher.update(input);
                hasher.finalize(&mut out);
            }
        }
        out
    }
}

impl FromStr for HashAlgorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keccak256" | "keccak-256" | "keccak" => Ok(HashAlgorithm::Keccak256),
            "sha3-256" | "sha3_256" | "sha3" => Ok(HashAlgorithm::Sha3_256),
            _ => Err(VerifyError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Keccak256 => write!(f, "keccak256"),
            HashAlgorithm::Sha3_256 => write!(f, "sha3-256"),
        }
    }
}

/// A parsed target: algorithm plus expected digest.
///
/// Text form is `[algorithm:]hex`, where the hex may carry a `0x` prefix and
/// is case-insensitive. Without an algorithm tag Keccak-256 is assumed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TargetHash {
    algorithm: HashAlgorithm,
    digest: [u8; DIGEST_LEN],
}

impl TargetHash {
    /// Computes the target that `input` hashes to.
    pub fn of(algorithm: HashAlgorithm, input: &[u8]) -> Self {
        Self {
            algorithm,
            digest: algorithm.digest(input),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Returns true if `candidate` hashes to this target.
    #[inline]
    pub fn matches(&self, candidate: &[u8]) -> bool {
        self.algorithm.digest(candidate) == self.digest
    }
}

impl FromStr for TargetHash {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (algorithm, hex_part) = match s.split_once(':') {
            Some((tag, rest)) => (tag.parse()?, rest),
            None => (HashAlgorithm::default(), s),
        };

        let hex_part = hex_part
            .strip_prefix("0x")
            .or_else(|| hex_part.strip_prefix("0X"))
            .unwrap_or(hex_part);

        let bytes = hex::decode(hex_part)
            .map_err(|e| VerifyError::MalformedTarget(format!("{}: {}", s, e)))?;
        let digest: [u8; DIGEST_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            VerifyError::MalformedTarget(format!(
                "{}: expected {} bytes, got {}",
                s,
                DIGEST_LEN,
                b.len()
            ))
        })?;

        Ok(Self { algorithm, digest })
    }
}

impl fmt::Debug for TargetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetHash({})", self)
    }
}

impl fmt::Display for TargetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, hex::encode(self.digest))
    }
}

/// Lowercase hex digest of `input` (no algorithm tag, no 0x).
pub fn digest_hex(algorithm: HashAlgorithm, input: &[u8]) -> String {
    hex::encode(algorithm.digest(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_vector() {
        assert_eq!(
            digest_hex(HashAlgorithm::Keccak256, b""),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_sha3_empty_vector() {
        assert_eq!(
            digest_hex(HashAlgorithm::Sha3_256, b""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_parse_untagged_defaults_to_keccak() {
        let hex = digest_hex(HashAlgorithm::Keccak256, b"ba");
        let target: TargetHash = hex.parse().unwrap();
        assert_eq!(target.algorithm(), HashAlgorithm::Keccak256);
        assert!(target.matches(b"ba"));
        assert!(!target.matches(b"ab"));
    }

    #[test]
    fn test_parse_tagged_prefixed_uppercase() {
        let hex = digest_hex(HashAlgorithm::Sha3_256, b"abc").to_uppercase();
        let target: TargetHash = format!("sha3-256:0x{}", hex).parse().unwrap();
        assert_eq!(target.algorithm(), HashAlgorithm::Sha3_256);
        assert!(target.matches(b"abc"));
    }

    #[test]
    fn test_display_parses_back() {
        let target = TargetHash::of(HashAlgorithm::Sha3_256, b"pw");
        let parsed: TargetHash = target.to_string().parse().unwrap();
        assert_eq!(parsed, target);
    }

    #[test]
    fn test_malformed_targets() {
        assert!(matches!(
            "zz".parse::<TargetHash>(),
            Err(VerifyError::MalformedTarget(_))
        ));
        assert!(matches!(
            "abcd".parse::<TargetHash>(),
            Err(VerifyError::MalformedTarget(_))
        ));
        assert!(matches!(
            "md5:abcd".parse::<TargetHash>(),
            Err(VerifyError::UnknownAlgorithm(_))
        ));
    }
}
