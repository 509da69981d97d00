//! The verification capability used by the search core.

use std::sync::OnceLock;

use super::{HashAlgorithm, TargetHash, DIGEST_LEN};

/// Checks whether a candidate password produces the target hash.
///
/// Implementations must be deterministic and free of side effects the
/// search could observe; they are called concurrently from every worker.
pub trait Verifier: Send + Sync {
    /// Returns `Ok(true)` on a match, `Ok(false)` otherwise, and an error
    /// when the target itself cannot be checked against.
    fn verify(&self, candidate: &[u8], target: &str) -> Result<bool, VerifyError>;
}

impl<F> Verifier for F
where
    F: Fn(&[u8], &str) -> Result<bool, VerifyError> + Send + Sync,
{
    #[inline]
    fn verify(&self, candidate: &[u8], target: &str) -> Result<bool, VerifyError> {
        self(candidate, target)
    }
}

/// Verifier backed by Keccak-256 / SHA3-256 digests.
///
/// The first target seen is parsed once and kept; a run checks every
/// candidate against the same target, so later calls only hash.
#[derive(Debug, Default)]
pub struct DigestVerifier {
    parsed: OnceLock<(String, Result<TargetHash, VerifyError>)>,
}

impl DigestVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Verifier for DigestVerifier {
    fn verify(&self, candidate: &[u8], target: &str) -> Result<bool, VerifyError> {
        let (source, parsed) = self
            .parsed
            .get_or_init(|| (target.to_string(), target.parse()));

        if source == target {
            match parsed {
                Ok(hash) => Ok(hash.matches(candidate)),
                Err(e) => Err(e.clone()),
            }
        } else {
            let hash: TargetHash = target.parse()?;
            Ok(hash.matches(candidate))
        }
    }
}

/// Verifier for crypt(3) strings: traditional DES (`ssHHHHHHHHHHH`, salt in
/// the first two characters) and the `$id$salt$hash` family.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptVerifier;

impl Verifier for CryptVerifier {
    fn verify(&self, candidate: &[u8], target: &str) -> Result<bool, VerifyError> {
        let hashed = pwhash::unix::crypt(candidate, target)
            .map_err(|e| VerifyError::MalformedTarget(format!("{}: {}", target, e)))?;
        Ok(hashed == target)
    }
}

/// Picks the verifier from the shape of the target text.
///
/// Digest targets (`algo:hex`, or bare hex of digest length) go to
/// `DigestVerifier`; everything else is treated as a crypt(3) string.
#[derive(Debug)]
pub enum TargetVerifier {
    Digest(DigestVerifier),
    Crypt(CryptVerifier),
}

impl TargetVerifier {
    pub fn for_target(target: &str) -> Self {
        if is_digest_form(target) {
            TargetVerifier::Digest(DigestVerifier::new())
        } else {
            TargetVerifier::Crypt(CryptVerifier)
        }
    }

    /// Short scheme name for display.
    pub fn scheme(&self) -> &'static str {
        match self {
            TargetVerifier::Digest(_) => "digest",
            TargetVerifier::Crypt(_) => "crypt",
        }
    }
}

impl Verifier for TargetVerifier {
    #[inline]
    fn verify(&self, candidate: &[u8], target: &str) -> Result<bool, VerifyError> {
        match self {
            TargetVerifier::Digest(v) => v.verify(candidate, target),
            TargetVerifier::Crypt(v) => v.verify(candidate, target),
        }
    }
}

fn is_digest_form(target: &str) -> bool {
    let target = target.trim();
    if let Some((tag, _)) = target.split_once(':') {
        return tag.parse::<HashAlgorithm>().is_ok();
    }
    let hex_part = target
        .strip_prefix("0x")
        .or_else(|| target.strip_prefix("0X"))
        .unwrap_or(target);
    hex_part.len() == DIGEST_LEN * 2 && hex_part.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Errors raised at the verifier boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("Malformed target hash: {0}")]
    MalformedTarget(String),

    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}
