//! Hashing and candidate verification.
//!
//! This module provides:
//! - Keccak-256 and SHA3-256 digests
//! - crypt(3) strings (traditional DES and `$id$` formats)
//! - Target hash parsing (`[algorithm:]hex`)
//! - The `Verifier` capability the search core checks candidates with

mod digest;
mod verifier;

pub use digest::{digest_hex, HashAlgorithm, TargetHash, DIGEST_LEN};
pub use verifier::{CryptVerifier, DigestVerifier, TargetVerifier, Verifier, VerifyError};
