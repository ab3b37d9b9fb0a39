//! Properties-file-backed realm.
//!
//! Identities are read from a users resource (`name=credential`) and a roles
//! resource (`name=role1,role2`), both in Java properties syntax. The users
//! resource may declare the realm name on a `#$REALM_NAME=<name>$` comment
//! line; that name salts the stored digests.
//!
//! Users-file values are either clear passwords (`plain_text`) or digests of
//! `name ":" realm ":" password`. A digest is hex, optionally tagged with
//! its algorithm: `digest-sha-256:9f86d0...`. Untagged digests use the
//! configured default algorithm.
//!
//! Loading parses into a scratch map and publishes it in one atomic swap.
//! Any failure moves the realm to [`RealmState::Failed`] and leaves nothing
//! observable from the failed attempt.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use idr_core::config::{ROLES_RESOURCE_KEY, USERS_RESOURCE_KEY};
use idr_core::{Event, EventType, PropertiesEncoding, PropertiesRealmConfig};
use idr_crypto::{DigestAlgorithm, ProviderHandle};
use idr_model::{Credential, Identity};
use parking_lot::RwLock;

use crate::builder::{IdentityMap, IdentityMapBuilder};
use crate::error::{RealmError, RealmResult};
use crate::properties::Properties;
use crate::realm::{LoadSummary, RealmKind, RealmState, SecurityRealm};
use crate::resolver::ResourceResolver;

/// Settings fixed at realm creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRealmSettings {
    /// Realm name used when the users resource does not declare one.
    pub default_realm: String,
    /// Whether users-file values are clear passwords.
    pub plain_text: bool,
    /// Algorithm for untagged digests.
    pub digest_algorithm: DigestAlgorithm,
    /// Encoding of both resources.
    pub encoding: PropertiesEncoding,
}

impl FileRealmSettings {
    /// Creates settings with MD5 as the default algorithm and UTF-8 content.
    #[must_use]
    pub fn new(default_realm: impl Into<String>, plain_text: bool) -> Self {
        Self {
            default_realm: default_realm.into(),
            plain_text,
            digest_algorithm: DigestAlgorithm::default(),
            encoding: PropertiesEncoding::default(),
        }
    }

    /// Sets the algorithm for untagged digests.
    #[must_use]
    pub const fn with_digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.digest_algorithm = algorithm;
        self
    }

    /// Sets the resource encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: PropertiesEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

impl From<&PropertiesRealmConfig> for FileRealmSettings {
    fn from(config: &PropertiesRealmConfig) -> Self {
        Self::new(config.realm_name.clone(), config.plain_text)
            .with_digest_algorithm(config.digest_algorithm)
            .with_encoding(config.encoding)
    }
}

#[derive(Debug)]
struct Published {
    realm_name: String,
    identities: IdentityMap,
}

/// Realm whose identities are loaded from properties resources.
#[derive(Debug)]
pub struct FileRealm {
    settings: FileRealmSettings,
    provider: ProviderHandle,
    state: RwLock<RealmState>,
    published: ArcSwapOption<Published>,
}

impl FileRealm {
    /// Creates an unloaded realm.
    #[must_use]
    pub fn create(settings: FileRealmSettings, provider: ProviderHandle) -> Self {
        tracing::debug!(
            realm = %settings.default_realm,
            plain_text = settings.plain_text,
            provider = provider.name(),
            "creating file-backed realm"
        );
        Event::builder(EventType::RealmCreated)
            .realm(settings.default_realm.as_str())
            .realm_kind(RealmKind::FileBacked.as_str())
            .detail("plain_text", settings.plain_text)
            .emit();

        Self {
            settings,
            provider,
            state: RwLock::new(RealmState::Created),
            published: ArcSwapOption::empty(),
        }
    }

    /// Returns the creation settings.
    #[must_use]
    pub const fn settings(&self) -> &FileRealmSettings {
        &self.settings
    }

    /// Loads identities from the named users and roles resources.
    ///
    /// Each resource is read to the end and released before the next one is
    /// opened. A load on an already loaded realm replaces its identities;
    /// lookups keep answering from the previous identities until the new
    /// ones are published.
    ///
    /// ## Errors
    ///
    /// - [`RealmError::RealmConfigurationMissing`] if neither resource exists
    /// - [`RealmError::PartialRealmConfiguration`] if only one exists
    /// - [`RealmError::RealmResourceReadError`] if reading fails
    /// - [`RealmError::MalformedRealmEntry`] for an unusable line
    /// - [`RealmError::InvalidState`] if a load is running or a previous one
    ///   failed
    ///
    /// Every error except `InvalidState` leaves the realm
    /// [`RealmState::Failed`].
    pub fn load(
        &self,
        users: &str,
        roles: &str,
        resolver: &dyn ResourceResolver,
    ) -> RealmResult<LoadSummary> {
        self.begin_load()?;
        let started_at = Utc::now();
        tracing::debug!(realm = %self.settings.default_realm, users, roles, "loading file-backed realm");

        match self.read_identities(users, roles, resolver) {
            Ok(published) => {
                let summary =
                    LoadSummary::new(RealmKind::FileBacked, published.realm_name.as_str(), started_at)
                        .complete(published.identities.values());
                self.published.store(Some(Arc::new(published)));
                *self.state.write() = RealmState::Loaded;

                tracing::info!(
                    realm = %summary.realm_name,
                    identities = summary.identities,
                    duration_ms = summary.duration_ms(),
                    "file-backed realm loaded"
                );
                Event::builder(EventType::RealmLoaded)
                    .realm(summary.realm_name.as_str())
                    .realm_kind(RealmKind::FileBacked.as_str())
                    .detail("identities", summary.identities)
                    .detail("users", users)
                    .detail("roles", roles)
                    .emit();
                Ok(summary)
            }
            Err(e) => {
                *self.state.write() = RealmState::Failed;

                tracing::warn!(realm = %self.settings.default_realm, error = %e, "file-backed realm load failed");
                Event::builder(EventType::RealmLoadFailed)
                    .failure(e.to_string())
                    .realm(self.settings.default_realm.as_str())
                    .realm_kind(RealmKind::FileBacked.as_str())
                    .emit();
                Err(e)
            }
        }
    }

    /// Loads using the resource names from the properties configuration.
    ///
    /// ## Errors
    ///
    /// Same as [`FileRealm::load`].
    pub fn load_from_config(
        &self,
        config: &PropertiesRealmConfig,
        resolver: &dyn ResourceResolver,
    ) -> RealmResult<LoadSummary> {
        self.load(&config.users, &config.roles, resolver)
    }

    fn begin_load(&self) -> RealmResult<()> {
        let mut state = self.state.write();
        match *state {
            RealmState::Created | RealmState::Loaded => {
                *state = RealmState::Loading;
                Ok(())
            }
            RealmState::Loading => Err(RealmError::InvalidState(format!(
                "realm '{}' is already loading",
                self.settings.default_realm
            ))),
            RealmState::Failed => Err(RealmError::InvalidState(format!(
                "realm '{}' failed to load; create a new realm",
                self.settings.default_realm
            ))),
        }
    }

    fn read_identities(
        &self,
        users_name: &str,
        roles_name: &str,
        resolver: &dyn ResourceResolver,
    ) -> RealmResult<Published> {
        let users_bytes = read_resource(resolver, users_name)?;
        let roles_bytes = read_resource(resolver, roles_name)?;

        let (users_bytes, roles_bytes) = match (users_bytes, roles_bytes) {
            (Some(users), Some(roles)) => (users, roles),
            (None, None) => {
                return Err(RealmError::RealmConfigurationMissing {
                    keys: PropertiesRealmConfig::resource_keys().to_vec(),
                })
            }
            (None, Some(_)) => {
                return Err(RealmError::PartialRealmConfiguration {
                    resource: users_name.to_string(),
                    key: USERS_RESOURCE_KEY,
                })
            }
            (Some(_), None) => {
                return Err(RealmError::PartialRealmConfiguration {
                    resource: roles_name.to_string(),
                    key: ROLES_RESOURCE_KEY,
                })
            }
        };

        let users = Properties::from_bytes(&users_bytes, self.settings.encoding)
            .map_err(|e| RealmError::malformed(users_name, e.line, e.detail))?;
        let roles = Properties::from_bytes(&roles_bytes, self.settings.encoding)
            .map_err(|e| RealmError::malformed(roles_name, e.line, e.detail))?;

        let realm_name = users
            .declared_realm_name()
            .unwrap_or(&self.settings.default_realm)
            .to_string();

        let mut role_map: HashMap<&str, &str> = HashMap::with_capacity(roles.len());
        for entry in roles.entries() {
            if entry.key.is_empty() {
                return Err(RealmError::malformed(roles_name, entry.line, "empty user name"));
            }
            if entry.value.is_empty() && !entry.has_separator {
                return Err(RealmError::malformed(
                    roles_name,
                    entry.line,
                    format!("no separator after user '{}'", entry.key),
                ));
            }
            role_map.insert(entry.key.as_str(), entry.value.as_str());
        }

        let mut builder = IdentityMapBuilder::new();
        for entry in users.entries() {
            if entry.key.is_empty() {
                return Err(RealmError::malformed(users_name, entry.line, "empty user name"));
            }
            if entry.value.is_empty() {
                return Err(RealmError::malformed(
                    users_name,
                    entry.line,
                    format!("no credential for user '{}'", entry.key),
                ));
            }
            let credential = self
                .parse_credential(&entry.value, &realm_name)
                .map_err(|detail| {
                    RealmError::malformed(
                        users_name,
                        entry.line,
                        format!("user '{}': {detail}", entry.key),
                    )
                })?;

            let raw_roles = role_map.get(entry.key.as_str()).copied();
            if raw_roles.is_none() {
                tracing::debug!(user = %entry.key, "no roles entry, user has no roles");
            }
            builder.insert(&entry.key, credential, raw_roles);
        }

        for name in role_map.keys() {
            if users.get(name).is_none() {
                tracing::debug!(user = *name, resource = roles_name, "roles entry for unknown user ignored");
            }
        }

        Ok(Published {
            realm_name,
            identities: builder.build(),
        })
    }

    /// Turns a users-file value into a credential. The error is a
    /// description safe to log: it never contains the value.
    fn parse_credential(&self, value: &str, realm_name: &str) -> Result<Credential, String> {
        if self.settings.plain_text {
            return Ok(Credential::clear(value));
        }

        let (algorithm, encoded) = match value.split_once(':') {
            Some((tag, encoded)) => (
                tag.parse::<DigestAlgorithm>().map_err(|e| e.to_string())?,
                encoded,
            ),
            None => (self.settings.digest_algorithm, value),
        };

        if !self.provider.supports(algorithm) {
            return Err(format!(
                "digest algorithm {algorithm} is not supported by provider '{}'",
                self.provider.name()
            ));
        }

        let digest = hex::decode(encoded.trim())
            .map_err(|_| format!("{algorithm} digest is not valid hex"))?;
        if digest.len() != algorithm.output_len() {
            return Err(format!(
                "{algorithm} digest must be {} bytes, found {}",
                algorithm.output_len(),
                digest.len()
            ));
        }

        Ok(Credential::digest(algorithm, digest, Some(realm_name.to_string())))
    }

    /// Returns the generation lookups are answered from. While a reload is
    /// running the previous generation keeps serving.
    fn published(&self) -> RealmResult<Arc<Published>> {
        match *self.state.read() {
            RealmState::Loaded | RealmState::Loading => self
                .published
                .load_full()
                .ok_or_else(|| RealmError::NotLoaded(self.settings.default_realm.clone())),
            RealmState::Failed => Err(RealmError::LoadFailed(self.settings.default_realm.clone())),
            RealmState::Created => Err(RealmError::NotLoaded(self.settings.default_realm.clone())),
        }
    }
}

/// Resolves and fully reads one resource. The stream is dropped on return.
fn read_resource(resolver: &dyn ResourceResolver, name: &str) -> RealmResult<Option<Vec<u8>>> {
    let Some(mut stream) = resolver.resolve(name).map_err(|e| RealmError::read(name, e))? else {
        tracing::debug!(resource = name, "realm resource not found");
        return Ok(None);
    };

    let mut bytes = Vec::new();
    stream
        .read_to_end(&mut bytes)
        .map_err(|e| RealmError::read(name, e))?;
    tracing::debug!(resource = name, bytes = bytes.len(), "realm resource read");
    Ok(Some(bytes))
}

impl SecurityRealm for FileRealm {
    fn kind(&self) -> RealmKind {
        RealmKind::FileBacked
    }

    fn state(&self) -> RealmState {
        *self.state.read()
    }

    fn realm_name(&self) -> String {
        self.published
            .load_full()
            .map_or_else(|| self.settings.default_realm.clone(), |p| p.realm_name.clone())
    }

    fn provider(&self) -> &ProviderHandle {
        &self.provider
    }

    fn lookup(&self, name: &str) -> RealmResult<Option<Arc<Identity>>> {
        Ok(self.published()?.identities.get(name).cloned())
    }

    fn identity_count(&self) -> RealmResult<usize> {
        Ok(self.published()?.identities.len())
    }
}
