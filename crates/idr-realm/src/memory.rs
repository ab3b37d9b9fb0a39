//! Config-backed realm.
//!
//! Identities come from two in-memory maps (user to clear secret, user to
//! roles), typically the `[users.embedded]` configuration table.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use idr_core::{EmbeddedRealmConfig, Event, EventType};
use idr_crypto::ProviderHandle;
use idr_model::Identity;

use crate::builder::{build_identity_map, IdentityMap};
use crate::error::{RealmError, RealmResult};
use crate::realm::{LoadSummary, RealmKind, RealmState, SecurityRealm};

/// Realm whose identities are built from configuration maps.
///
/// A failed [`ConfigRealm::build`] leaves the previously published map and
/// state in place.
#[derive(Debug)]
pub struct ConfigRealm {
    realm_name: String,
    provider: ProviderHandle,
    identities: ArcSwapOption<IdentityMap>,
}

impl ConfigRealm {
    /// Creates an empty realm.
    #[must_use]
    pub fn new(realm_name: impl Into<String>, provider: ProviderHandle) -> Self {
        let realm_name = realm_name.into();
        tracing::debug!(realm = %realm_name, "creating config-backed realm");
        Event::builder(EventType::RealmCreated)
            .realm(realm_name.as_str())
            .realm_kind(RealmKind::ConfigBacked.as_str())
            .emit();

        Self {
            realm_name,
            provider,
            identities: ArcSwapOption::empty(),
        }
    }

    /// Creates an empty realm named after the embedded configuration.
    #[must_use]
    pub fn from_config(config: &EmbeddedRealmConfig, provider: ProviderHandle) -> Self {
        Self::new(config.realm_name.clone(), provider)
    }

    /// Builds identities from the two maps and publishes them, replacing
    /// whatever was published before.
    ///
    /// ## Errors
    ///
    /// Returns [`RealmError::MissingRoleMapping`] if a user has no roles
    /// entry. Nothing is published in that case.
    pub fn build(
        &self,
        users: &BTreeMap<String, String>,
        roles: &BTreeMap<String, String>,
    ) -> RealmResult<LoadSummary> {
        let started_at = Utc::now();
        tracing::debug!(realm = %self.realm_name, users = users.len(), "building config-backed realm");

        let identities = match build_identity_map(users, roles) {
            Ok(identities) => identities,
            Err(e) => {
                tracing::warn!(realm = %self.realm_name, error = %e, "config-backed realm build failed");
                Event::builder(EventType::RealmLoadFailed)
                    .failure(e.to_string())
                    .realm(self.realm_name.as_str())
                    .realm_kind(RealmKind::ConfigBacked.as_str())
                    .emit();
                return Err(e);
            }
        };

        let summary = LoadSummary::new(RealmKind::ConfigBacked, self.realm_name.as_str(), started_at)
            .complete(identities.values());
        self.identities.store(Some(Arc::new(identities)));

        tracing::info!(
            realm = %self.realm_name,
            identities = summary.identities,
            "config-backed realm published"
        );
        Event::builder(EventType::RealmLoaded)
            .realm(self.realm_name.as_str())
            .realm_kind(RealmKind::ConfigBacked.as_str())
            .detail("identities", summary.identities)
            .emit();

        Ok(summary)
    }

    /// Builds identities from the embedded configuration.
    ///
    /// ## Errors
    ///
    /// Same as [`ConfigRealm::build`].
    pub fn build_from_config(&self, config: &EmbeddedRealmConfig) -> RealmResult<LoadSummary> {
        self.build(&config.users, &config.roles)
    }

    fn published(&self) -> RealmResult<Arc<IdentityMap>> {
        self.identities
            .load_full()
            .ok_or_else(|| RealmError::NotLoaded(self.realm_name.clone()))
    }
}

impl SecurityRealm for ConfigRealm {
    fn kind(&self) -> RealmKind {
        RealmKind::ConfigBacked
    }

    fn state(&self) -> RealmState {
        if self.identities.load().is_some() {
            RealmState::Loaded
        } else {
            RealmState::Created
        }
    }

    fn realm_name(&self) -> String {
        self.realm_name.clone()
    }

    fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    fn lookup(&self, name: &str) -> RealmResult<Option<Arc<Identity>>> {
        Ok(self.published()?.get(name).cloned())
    }

    fn identity_count(&self) -> RealmResult<usize> {
        Ok(self.published()?.len())
    }
}
