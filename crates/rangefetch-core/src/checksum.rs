//! SHA-256 verification of the accumulated payload.
//!
//! The digest is computed once, after the fetch loop, over the whole buffer.

use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a SHA-256 digest in bytes.
pub const SHA256_LEN: usize = 32;

/// Compute SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; SHA256_LEN] {
    Sha256::digest(data).into()
}

/// Compute SHA-256 of `data` and return the digest as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Expected digest as given by the caller.
///
/// Parsing never fails: a string that is not 64 hex characters is kept for
/// display but can never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    normalized: String,
    bytes: Option<[u8; SHA256_LEN]>,
}

impl ExpectedDigest {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        let bytes = hex::decode(&normalized)
            .ok()
            .and_then(|v| <[u8; SHA256_LEN]>::try_from(v.as_slice()).ok());
        Self { normalized, bytes }
    }

    /// Lowercased, trimmed form of the input.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn is_well_formed(&self) -> bool {
        self.bytes.is_some()
    }

    /// Byte-for-byte comparison against a computed digest.
    pub fn matches(&self, computed: &[u8; SHA256_LEN]) -> bool {
        self.bytes.as_ref() == Some(computed)
    }
}

/// Outcome of comparing computed and expected digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        self == Verdict::Match
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Match => write!(f, "data is correct"),
            Verdict::Mismatch => write!(f, "data mismatch"),
        }
    }
}

/// Hash `data` and compare against `expected`. Returns the computed hex digest
/// together with the verdict.
pub fn verify(data: &[u8], expected: &ExpectedDigest) -> (String, Verdict) {
    let digest = sha256(data);
    let verdict = if expected.matches(&digest) {
        Verdict::Match
    } else {
        Verdict::Mismatch
    };
    (hex::encode(digest), verdict)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn sha256_hex_empty() {
        assert_eq!(sha256_hex(b""), EMPTY_SHA256);
    }

    #[test]
    fn sha256_hex_known_content() {
        assert_eq!(
            sha256_hex(b"hello\n"),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn expected_digest_is_case_insensitive() {
        let upper = EMPTY_SHA256.to_ascii_uppercase();
        let expected = ExpectedDigest::parse(&upper);
        assert!(expected.is_well_formed());
        assert_eq!(expected.as_str(), EMPTY_SHA256);
        let (computed, verdict) = verify(b"", &expected);
        assert_eq!(computed, EMPTY_SHA256);
        assert_eq!(verdict, Verdict::Match);
    }

    #[test]
    fn malformed_expected_digest_is_mismatch() {
        let too_long = format!("{}00", EMPTY_SHA256);
        for raw in ["", "abc", "zz", &EMPTY_SHA256[..63], too_long.as_str()] {
            let expected = ExpectedDigest::parse(raw);
            assert!(!expected.is_well_formed(), "{raw:?} should be malformed");
            let (computed, verdict) = verify(b"", &expected);
            assert_eq!(computed, EMPTY_SHA256);
            assert_eq!(verdict, Verdict::Mismatch);
        }
    }

    #[test]
    fn different_content_is_mismatch() {
        let expected = ExpectedDigest::parse(EMPTY_SHA256);
        let (_, verdict) = verify(b"x", &expected);
        assert!(!verdict.is_match());
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Match.to_string(), "data is correct");
        assert_eq!(Verdict::Mismatch.to_string(), "data mismatch");
    }
}
