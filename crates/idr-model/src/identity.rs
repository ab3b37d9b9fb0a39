//! Identity domain model.
//!
//! An identity is a named principal inside a realm, with its credentials
//! and its attributes (roles live under [`GROUPS`]).

use crate::attributes::{Attributes, GROUPS};
use crate::credential::Credential;

/// A realm identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Identity name. Unique and case-sensitive within a realm.
    pub name: String,
    /// Credentials, in insertion order.
    pub credentials: Vec<Credential>,
    /// Authorization attributes.
    pub attributes: Attributes,
}

impl Identity {
    /// Creates an identity with a single credential.
    #[must_use]
    pub fn new(name: impl Into<String>, credential: Credential, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            credentials: vec![credential],
            attributes,
        }
    }

    /// Returns the role names, in source order.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        self.attributes.get(GROUPS)
    }

    /// Returns the password credential, if any.
    #[must_use]
    pub fn password(&self) -> Option<&Credential> {
        self.credentials.iter().find(|c| c.is_password())
    }
}
