//! Digest provider handles.
//!
//! Realms never reach for a process-wide crypto registry. The provider they
//! use is handed to them at construction as a [`ProviderHandle`], which makes
//! the set of accepted algorithms an explicit, per-realm decision.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use crate::algorithm::{AlgorithmError, DigestAlgorithm};
use crate::hash;

/// Shared handle to a digest provider.
pub type ProviderHandle = Arc<dyn DigestProvider>;

/// Source of digest implementations for credential checks.
pub trait DigestProvider: Send + Sync + Debug {
    /// Returns the provider name, used in error messages and logs.
    fn name(&self) -> &str;

    /// Returns whether the provider offers the given algorithm.
    fn supports(&self, algorithm: DigestAlgorithm) -> bool;

    /// Computes a digest.
    ///
    /// ## Errors
    ///
    /// Returns [`AlgorithmError::Unsupported`] if the algorithm is not offered.
    fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, AlgorithmError>;

    /// Computes `H(username ":" realm ":" password)` with this provider.
    ///
    /// ## Errors
    ///
    /// Returns [`AlgorithmError::Unsupported`] if the algorithm is not offered.
    fn user_realm_digest(
        &self,
        algorithm: DigestAlgorithm,
        username: &str,
        realm: &str,
        password: &str,
    ) -> Result<Vec<u8>, AlgorithmError> {
        self.digest(algorithm, &hash::user_realm_input(username, realm, password))
    }
}

/// Provider backed by aws-lc-rs and the `md5` crate.
///
/// Offers every [`DigestAlgorithm`] unless restricted with
/// [`DefaultDigestProvider::with_algorithms`].
#[derive(Debug, Clone)]
pub struct DefaultDigestProvider {
    allowed: HashSet<DigestAlgorithm>,
}

impl DefaultDigestProvider {
    /// Provider name.
    pub const NAME: &'static str = "idr-default";

    /// Creates a provider offering every algorithm.
    #[must_use]
    pub fn new() -> Self {
        Self::with_algorithms(DigestAlgorithm::ALL)
    }

    /// Creates a provider restricted to the given algorithms.
    #[must_use]
    pub fn with_algorithms(algorithms: impl IntoIterator<Item = DigestAlgorithm>) -> Self {
        Self {
            allowed: algorithms.into_iter().collect(),
        }
    }

    /// Wraps the provider in a shareable handle.
    #[must_use]
    pub fn into_handle(self) -> ProviderHandle {
        Arc::new(self)
    }
}

impl Default for DefaultDigestProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DigestProvider for DefaultDigestProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supports(&self, algorithm: DigestAlgorithm) -> bool {
        self.allowed.contains(&algorithm)
    }

    fn digest(&self, algorithm: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, AlgorithmError> {
        if !self.supports(algorithm) {
            return Err(AlgorithmError::Unsupported {
                algorithm: algorithm.name(),
                provider: Self::NAME.to_string(),
            });
        }
        Ok(hash::hash(algorithm, data))
    }
}

/// Returns a handle to the default provider with every algorithm enabled.
#[must_use]
pub fn default_provider() -> ProviderHandle {
    DefaultDigestProvider::new().into_handle()
}
