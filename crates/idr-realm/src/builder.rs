//! Identity map construction shared by both realm variants.
//!
//! Role strings are split literally on `,`: no trimming, so `"a, b"` yields
//! the roles `"a"` and `" b"`. Empty segments are dropped, which keeps every
//! stored role non-empty.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use idr_model::{Attributes, Credential, Identity, GROUPS};

use crate::error::{RealmError, RealmResult};

/// Identity name to identity.
pub type IdentityMap = HashMap<String, Arc<Identity>>;

/// Splits a comma-separated role string.
pub fn split_roles(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').filter(|role| !role.is_empty())
}

/// Builds the attribute set for a role string.
#[must_use]
pub fn role_attributes(raw: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.add_all(GROUPS, split_roles(raw));
    attributes
}

/// Accumulates identities into a scratch map before publication.
///
/// Inserting a name twice replaces the earlier identity.
#[derive(Debug, Default)]
pub struct IdentityMapBuilder {
    identities: IdentityMap,
}

impl IdentityMapBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identity with one credential and the roles from `raw_roles`.
    pub fn insert(&mut self, name: &str, credential: Credential, raw_roles: Option<&str>) {
        let attributes = raw_roles.map(role_attributes).unwrap_or_default();
        tracing::debug!(
            user = name,
            credential = credential.kind().as_str(),
            roles = ?attributes.get(GROUPS),
            "added user"
        );

        let identity = Identity::new(name, credential, attributes);
        if self
            .identities
            .insert(name.to_string(), Arc::new(identity))
            .is_some()
        {
            tracing::debug!(user = name, "duplicate user entry replaced");
        }
    }

    /// Returns the number of identities so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Checks if no identity was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Finishes the map.
    #[must_use]
    pub fn build(self) -> IdentityMap {
        self.identities
    }
}

/// Builds an identity map from a users map (name to clear secret) and a
/// roles map (name to comma-separated roles).
///
/// ## Errors
///
/// Returns [`RealmError::MissingRoleMapping`] for the first user, in name
/// order, that has no roles entry.
pub fn build_identity_map(
    users: &BTreeMap<String, String>,
    roles: &BTreeMap<String, String>,
) -> RealmResult<IdentityMap> {
    let mut builder = IdentityMapBuilder::new();

    for (user, secret) in users {
        let raw_roles = roles
            .get(user)
            .ok_or_else(|| RealmError::MissingRoleMapping { user: user.clone() })?;
        builder.insert(user, Credential::clear(secret.as_str()), Some(raw_roles.as_str()));
    }

    Ok(builder.build())
}
