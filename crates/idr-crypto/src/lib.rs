//! # idr-crypto
//!
//! Digest support for password credentials held by identity realms.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-5: Authenticator Management
//! - SC-13: Cryptographic protection
//!
//! MD5 and SHA-1 are present only because existing users files carry them.
//! Deployments choosing an algorithm for new entries should prefer the
//! SHA-2 family.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod hash;
pub mod provider;

pub use algorithm::{AlgorithmError, DigestAlgorithm};
pub use hash::{constant_time_eq, user_realm_digest};
pub use provider::{default_provider, DefaultDigestProvider, DigestProvider, ProviderHandle};
