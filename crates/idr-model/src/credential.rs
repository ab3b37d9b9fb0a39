//! Credential domain model.
//!
//! A realm identity carries exactly one password credential, either the
//! clear secret or a pre-computed `H(user:realm:password)` digest.
//!
//! ## Security Note
//!
//! Neither variant prints its secret material through `Debug`. Clear
//! secrets are held in a [`SecretString`], which also zeroizes on drop.

use std::fmt;

use idr_crypto::{constant_time_eq, DigestAlgorithm};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Credential kind, used in logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    /// Clear-text password.
    ClearPassword,
    /// Pre-digested password.
    DigestPassword,
}

impl CredentialKind {
    /// Returns the string representation used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClearPassword => "clear-password",
            Self::DigestPassword => "digest-password",
        }
    }
}

/// A clear-text password.
pub struct ClearPassword(SecretString);

impl ClearPassword {
    /// Wraps a clear-text secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    /// Exposes the secret. Callers must not log the returned value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Checks a presented password in constant time.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        constant_time_eq(self.expose().as_bytes(), presented.as_bytes())
    }
}

impl Clone for ClearPassword {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_owned())
    }
}

impl PartialEq for ClearPassword {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.expose())
    }
}

impl Eq for ClearPassword {}

impl fmt::Debug for ClearPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearPassword([REDACTED])")
    }
}

/// A pre-computed password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct DigestPassword {
    /// Digest algorithm.
    pub algorithm: DigestAlgorithm,
    /// Raw digest bytes.
    pub digest: Vec<u8>,
    /// Realm name mixed into the digest input, if any.
    pub realm: Option<String>,
}

impl DigestPassword {
    /// Creates a digest credential.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm, digest: Vec<u8>, realm: Option<String>) -> Self {
        Self {
            algorithm,
            digest,
            realm,
        }
    }

    /// Checks a freshly computed digest in constant time.
    #[must_use]
    pub fn matches(&self, computed: &[u8]) -> bool {
        constant_time_eq(&self.digest, computed)
    }
}

impl fmt::Debug for DigestPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestPassword")
            .field("algorithm", &self.algorithm)
            .field("digest", &"[REDACTED]")
            .field("realm", &self.realm)
            .finish()
    }
}

/// A credential attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Clear-text password.
    ClearText(ClearPassword),
    /// Pre-digested password.
    Digest(DigestPassword),
}

impl Credential {
    /// Creates a clear-text password credential.
    #[must_use]
    pub fn clear(secret: impl Into<String>) -> Self {
        Self::ClearText(ClearPassword::new(secret))
    }

    /// Creates a digest password credential.
    #[must_use]
    pub fn digest(algorithm: DigestAlgorithm, digest: Vec<u8>, realm: Option<String>) -> Self {
        Self::Digest(DigestPassword::new(algorithm, digest, realm))
    }

    /// Returns the credential kind.
    #[must_use]
    pub const fn kind(&self) -> CredentialKind {
        match self {
            Self::ClearText(_) => CredentialKind::ClearPassword,
            Self::Digest(_) => CredentialKind::DigestPassword,
        }
    }

    /// Checks if this is a clear-text password.
    #[must_use]
    pub const fn is_clear_text(&self) -> bool {
        matches!(self, Self::ClearText(_))
    }

    /// Checks if this is a password credential of either form.
    #[must_use]
    pub const fn is_password(&self) -> bool {
        matches!(self, Self::ClearText(_) | Self::Digest(_))
    }
}
