//! Content hashing for fingerprints.
//!
//! Built-in algorithms produce lowercase hex digests of the raw bytes.
//! Custom hashers are any `Fn(&[u8]) -> Result<String, HashError>`.
//!
//! # Usage
//!
//! ```ignore
//! use crate::hash::{ContentHasher, HashAlgorithm};
//!
//! let h = HashAlgorithm::Md5.hash(b"png data")?; // "e8e7c184..."
//! ```

use std::fmt;
use std::str::FromStr;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from hash functions. Always fatal for the build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("hash function failed: {0}")]
    Failed(String),

    #[error("hash function returned an empty string")]
    Empty,

    #[error("hash `{0}` contains characters not allowed in file names")]
    Invalid(String),
}

/// Anything that turns file content into a fingerprint string.
pub trait ContentHasher: Send + Sync {
    fn hash(&self, bytes: &[u8]) -> Result<String, HashError>;
}

impl<F> ContentHasher for F
where
    F: Fn(&[u8]) -> Result<String, HashError> + Send + Sync,
{
    fn hash(&self, bytes: &[u8]) -> Result<String, HashError> {
        self(bytes)
    }
}

/// Check that a hash can be embedded in a file name.
pub fn validate(digest: &str) -> Result<(), HashError> {
    if digest.is_empty() {
        return Err(HashError::Empty);
    }
    if digest.contains(['/', '\\', '\0']) {
        return Err(HashError::Invalid(digest.to_string()));
    }
    Ok(())
}

// ============================================================================
// Built-in algorithms
// ============================================================================

/// Built-in digest algorithms, selectable from config (`hash = "sha1"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    /// Compute the full hex digest.
    pub fn hex_digest(self, bytes: &[u8]) -> String {
        match self {
            Self::Md5 => hex::encode(Md5::digest(bytes)),
            Self::Sha1 => hex::encode(Sha1::digest(bytes)),
            Self::Sha256 => hex::encode(Sha256::digest(bytes)),
            Self::Blake3 => blake3::hash(bytes).to_hex().to_string(),
        }
    }

    /// Full digest length in hex characters.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 | Self::Blake3 => 64,
        }
    }

    /// Truncate digests to `len` hex characters (`0` keeps the full digest).
    pub fn truncated(self, len: usize) -> Truncated {
        Truncated {
            algorithm: self,
            len,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl ContentHasher for HashAlgorithm {
    fn hash(&self, bytes: &[u8]) -> Result<String, HashError> {
        Ok(self.hex_digest(bytes))
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!(
                "unknown hash algorithm `{other}` (expected md5, sha1, sha256, blake3 or none)"
            )),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built-in algorithm with its digest cut to a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated {
    algorithm: HashAlgorithm,
    len: usize,
}

impl ContentHasher for Truncated {
    fn hash(&self, bytes: &[u8]) -> Result<String, HashError> {
        let mut digest = self.algorithm.hex_digest(bytes);
        if self.len > 0 {
            digest.truncate(self.len);
        }
        Ok(digest)
    }
}
