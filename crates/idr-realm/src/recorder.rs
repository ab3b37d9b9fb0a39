//! Two-phase realm startup.
//!
//! [`RealmRecorder::create_realm`] builds an unloaded realm early, so it can
//! be registered wherever it is needed. [`RealmRecorder::load_realm`] returns
//! a [`LoadTask`] that populates it later, once resources are available.

use std::fmt;
use std::sync::Arc;

use idr_core::{RealmConfig, SecurityConfig};
use idr_crypto::ProviderHandle;

use crate::error::{RealmError, RealmResult};
use crate::file::{FileRealm, FileRealmSettings};
use crate::memory::ConfigRealm;
use crate::realm::{LoadSummary, Realm, SecurityRealm};
use crate::resolver::ResourceResolver;

type LoadAction = Box<dyn FnOnce(&Realm) -> RealmResult<LoadSummary> + Send>;

/// A deferred realm load.
pub struct LoadTask {
    realm: Arc<Realm>,
    action: LoadAction,
}

impl LoadTask {
    /// Returns the realm the task will load.
    #[must_use]
    pub const fn realm(&self) -> &Arc<Realm> {
        &self.realm
    }

    /// Runs the load.
    ///
    /// ## Errors
    ///
    /// Returns the load error of the underlying realm, or
    /// [`RealmError::RealmKindMismatch`] if the task was created with
    /// configuration for the other realm kind.
    pub fn run(self) -> RealmResult<LoadSummary> {
        (self.action)(&self.realm)
    }
}

impl fmt::Debug for LoadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadTask")
            .field("realm", &self.realm.realm_name())
            .field("kind", &self.realm.kind())
            .finish_non_exhaustive()
    }
}

/// Creates realms from configuration and schedules their loads.
#[derive(Debug, Clone)]
pub struct RealmRecorder {
    provider: ProviderHandle,
}

impl RealmRecorder {
    /// Creates a recorder whose realms use `provider` for digests.
    #[must_use]
    pub fn new(provider: ProviderHandle) -> Self {
        Self { provider }
    }

    /// Creates an unloaded realm for the configuration.
    #[must_use]
    pub fn create_realm(&self, config: &RealmConfig) -> Arc<Realm> {
        tracing::debug!(kind = config.kind_name(), "creating realm");
        let realm = match config {
            RealmConfig::Embedded(embedded) => {
                Realm::Config(ConfigRealm::from_config(embedded, Arc::clone(&self.provider)))
            }
            RealmConfig::Properties(properties) => Realm::File(FileRealm::create(
                FileRealmSettings::from(properties),
                Arc::clone(&self.provider),
            )),
        };
        Arc::new(realm)
    }

    /// Returns a task that loads `realm` from `config`.
    ///
    /// The resolver is only consulted for properties configuration.
    #[must_use]
    pub fn load_realm(
        &self,
        realm: Arc<Realm>,
        config: &RealmConfig,
        resolver: Arc<dyn ResourceResolver>,
    ) -> LoadTask {
        tracing::debug!(kind = config.kind_name(), realm = %realm.realm_name(), "scheduling realm load");
        let config_kind = config.kind_name();

        let action: LoadAction = match config.clone() {
            RealmConfig::Embedded(embedded) => Box::new(move |realm: &Realm| match realm {
                Realm::Config(realm) => realm.build_from_config(&embedded),
                other => Err(RealmError::RealmKindMismatch {
                    realm: other.kind().as_str(),
                    config: config_kind,
                }),
            }),
            RealmConfig::Properties(properties) => Box::new(move |realm: &Realm| match realm {
                Realm::File(realm) => realm.load_from_config(&properties, resolver.as_ref()),
                other => Err(RealmError::RealmKindMismatch {
                    realm: other.kind().as_str(),
                    config: config_kind,
                }),
            }),
        };

        LoadTask { realm, action }
    }

    /// Creates the realm selected by the security configuration and its
    /// load task.
    ///
    /// ## Errors
    ///
    /// Returns [`RealmError::Config`] unless exactly one realm is enabled.
    pub fn from_security_config(
        &self,
        config: &SecurityConfig,
        resolver: Arc<dyn ResourceResolver>,
    ) -> RealmResult<LoadTask> {
        let realm_config = config.realm_config()?;
        let realm = self.create_realm(&realm_config);
        Ok(self.load_realm(realm, &realm_config, resolver))
    }
}
