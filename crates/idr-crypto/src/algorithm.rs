//! Password digest algorithm definitions.
//!
//! Digest credentials in a properties realm are stored as
//! `H(username ":" realm ":" password)`. The algorithm names follow the
//! `digest-*` naming used by properties-file tooling, so a users file written
//! by another tool can be migrated without rewriting its entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for algorithm operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlgorithmError {
    /// Unknown algorithm name.
    #[error("unknown digest algorithm: {0}")]
    Unknown(String),

    /// Algorithm is known but not offered by the provider in use.
    #[error("digest algorithm '{algorithm}' is not supported by provider '{provider}'")]
    Unsupported {
        /// Algorithm name.
        algorithm: &'static str,
        /// Provider name.
        provider: String,
    },
}

/// Digest algorithms accepted for pre-hashed password entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// MD5. The historical default for properties realms.
    #[default]
    #[serde(rename = "digest-md5")]
    Md5,

    /// SHA-1.
    #[serde(rename = "digest-sha")]
    Sha1,

    /// SHA-256.
    #[serde(rename = "digest-sha-256")]
    Sha256,

    /// SHA-384.
    #[serde(rename = "digest-sha-384")]
    Sha384,

    /// SHA-512.
    #[serde(rename = "digest-sha-512")]
    Sha512,

    /// SHA-512 truncated to 256 bits.
    #[serde(rename = "digest-sha-512-256")]
    Sha512_256,
}

impl DigestAlgorithm {
    /// All algorithms, strongest last.
    pub const ALL: [Self; 6] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_256,
    ];

    /// Returns the digest output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 | Self::Sha512_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Returns the algorithm name as written in users files and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "digest-md5",
            Self::Sha1 => "digest-sha",
            Self::Sha256 => "digest-sha-256",
            Self::Sha384 => "digest-sha-384",
            Self::Sha512 => "digest-sha-512",
            Self::Sha512_256 => "digest-sha-512-256",
        }
    }

    /// Parses an algorithm name.
    ///
    /// ## Errors
    ///
    /// Returns [`AlgorithmError::Unknown`] for names outside the catalogue.
    pub fn from_name(name: &str) -> Result<Self, AlgorithmError> {
        match name {
            "digest-md5" => Ok(Self::Md5),
            "digest-sha" => Ok(Self::Sha1),
            "digest-sha-256" => Ok(Self::Sha256),
            "digest-sha-384" => Ok(Self::Sha384),
            "digest-sha-512" => Ok(Self::Sha512),
            "digest-sha-512-256" => Ok(Self::Sha512_256),
            _ => Err(AlgorithmError::Unknown(name.to_string())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(DigestAlgorithm::from_name(alg.name()), Ok(alg));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let result = DigestAlgorithm::from_name("hex-md5");
        assert!(matches!(result, Err(AlgorithmError::Unknown(_))));
    }

    #[test]
    fn output_lengths() {
        assert_eq!(DigestAlgorithm::Md5.output_len(), 16);
        assert_eq!(DigestAlgorithm::Sha1.output_len(), 20);
        assert_eq!(DigestAlgorithm::Sha512_256.output_len(), 32);
        assert_eq!(DigestAlgorithm::Sha512.output_len(), 64);
    }

    #[test]
    fn md5_is_the_default() {
        assert_eq!(DigestAlgorithm::default(), DigestAlgorithm::Md5);
    }

    #[test]
    fn display_and_from_str_agree() {
        assert_eq!(DigestAlgorithm::Sha384.to_string(), "digest-sha-384");
        assert_eq!(
            "digest-sha".parse::<DigestAlgorithm>(),
            Ok(DigestAlgorithm::Sha1)
        );
    }
}
