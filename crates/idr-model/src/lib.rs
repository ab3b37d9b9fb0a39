//! # idr-model
//!
//! Domain model shared by identity realms: identities, their credentials and
//! their multi-valued attributes.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod attributes;
pub mod credential;
pub mod identity;

pub use attributes::{Attributes, GROUPS};
pub use credential::{ClearPassword, Credential, CredentialKind, DigestPassword};
pub use identity::Identity;
