//! Realm abstraction.
//!
//! A realm answers two questions: who is `name`, and does `password` prove
//! it. The two variants ([`ConfigRealm`] and [`FileRealm`]) are closed over
//! by the [`Realm`] enum; callers that only need lookups program against the
//! [`SecurityRealm`] trait.
//!
//! ## NIST 800-53 Rev5: IA-2 (Identification and Authentication)
//!
//! Unknown users and wrong passwords produce the same `Ok(None)` result, so
//! a caller cannot tell which of the two happened from the return value.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use idr_core::{Event, EventType};
use idr_crypto::ProviderHandle;
use idr_model::{Credential, Identity};

use crate::error::RealmResult;
use crate::file::FileRealm;
use crate::memory::ConfigRealm;

/// Lifecycle state of a realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealmState {
    /// Constructed, nothing published yet.
    Created,
    /// A load is in progress.
    Loading,
    /// Identities are published and lookups are served.
    Loaded,
    /// The last load failed. Lookups are refused.
    Failed,
}

impl RealmState {
    /// Returns the state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RealmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Realm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealmKind {
    /// Identities from in-memory configuration maps.
    ConfigBacked,
    /// Identities from users/roles properties resources.
    FileBacked,
}

impl RealmKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigBacked => "config-backed",
            Self::FileBacked => "file-backed",
        }
    }
}

impl fmt::Display for RealmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful load or build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Realm kind.
    pub kind: RealmKind,
    /// Effective realm name after the load.
    pub realm_name: String,
    /// Number of published identities.
    pub identities: usize,
    /// Number of identities carrying at least one role.
    pub with_roles: usize,
    /// When the load started.
    pub started_at: DateTime<Utc>,
    /// When the identities were published.
    pub completed_at: DateTime<Utc>,
}

impl LoadSummary {
    pub(crate) fn new(kind: RealmKind, realm_name: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            realm_name: realm_name.into(),
            identities: 0,
            with_roles: 0,
            started_at,
            completed_at: started_at,
        }
    }

    pub(crate) fn complete<'a>(mut self, identities: impl Iterator<Item = &'a Arc<Identity>>) -> Self {
        for identity in identities {
            self.identities += 1;
            if !identity.roles().is_empty() {
                self.with_roles += 1;
            }
        }
        self.completed_at = Utc::now();
        self
    }

    /// Returns the load duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.completed_at - self.started_at).num_milliseconds()
    }
}

/// An identity whose password was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Identity name.
    pub name: String,
    /// Name of the realm that verified it.
    pub realm: String,
    /// Roles granted by the realm.
    pub roles: Vec<String>,
}

/// Read access to a realm's identities.
pub trait SecurityRealm: Send + Sync {
    /// Returns the realm variant.
    fn kind(&self) -> RealmKind;

    /// Returns the current lifecycle state.
    fn state(&self) -> RealmState;

    /// Returns the effective realm name.
    fn realm_name(&self) -> String;

    /// Returns the digest provider the realm was created with.
    fn provider(&self) -> &ProviderHandle;

    /// Looks up an identity by exact, case-sensitive name.
    ///
    /// ## Errors
    ///
    /// Returns [`RealmError::NotLoaded`](crate::RealmError::NotLoaded) or
    /// [`RealmError::LoadFailed`](crate::RealmError::LoadFailed) when the
    /// realm has no published identities to answer from.
    fn lookup(&self, name: &str) -> RealmResult<Option<Arc<Identity>>>;

    /// Returns the number of published identities.
    ///
    /// ## Errors
    ///
    /// Same as [`SecurityRealm::lookup`].
    fn identity_count(&self) -> RealmResult<usize>;

    /// Checks a presented password against the identity's credential.
    ///
    /// Returns `Ok(None)` for an unknown user and for a wrong password.
    ///
    /// ## Errors
    ///
    /// Same as [`SecurityRealm::lookup`].
    fn verify_password(
        &self,
        name: &str,
        password: &str,
    ) -> RealmResult<Option<AuthenticatedIdentity>> {
        let realm = self.realm_name();
        let identity = self.lookup(name)?;

        let verified = identity
            .filter(|identity| password_matches(identity, password, self.provider()));

        match verified {
            Some(identity) => {
                let mut event = Event::builder(EventType::AuthenticationSucceeded)
                    .realm(realm.as_str())
                    .realm_kind(self.kind().as_str())
                    .identity(name);
                if let Some(credential) = identity.password() {
                    event = event.detail("credential", credential.kind().as_str());
                }
                event.emit();
                Ok(Some(AuthenticatedIdentity {
                    name: identity.name.clone(),
                    realm,
                    roles: identity.roles().to_vec(),
                }))
            }
            None => {
                Event::builder(EventType::AuthenticationFailed)
                    .failure("invalid credentials")
                    .realm(realm.as_str())
                    .realm_kind(self.kind().as_str())
                    .identity(name)
                    .emit();
                Ok(None)
            }
        }
    }
}

/// Checks `password` against the identity's password credential.
///
/// Clear secrets are compared in constant time. Digests are recomputed as
/// `H(name ":" realm ":" password)` with the realm's provider, using the
/// realm name stored on the credential.
pub(crate) fn password_matches(
    identity: &Identity,
    password: &str,
    provider: &ProviderHandle,
) -> bool {
    match identity.password() {
        Some(Credential::ClearText(secret)) => secret.matches(password),
        Some(Credential::Digest(stored)) => {
            let realm = stored.realm.as_deref().unwrap_or_default();
            match provider.user_realm_digest(stored.algorithm, &identity.name, realm, password) {
                Ok(computed) => stored.matches(&computed),
                Err(e) => {
                    tracing::warn!(user = %identity.name, error = %e, "digest verification unavailable");
                    false
                }
            }
        }
        None => false,
    }
}

/// A realm of either variant.
#[derive(Debug)]
pub enum Realm {
    /// Config-backed realm.
    Config(ConfigRealm),
    /// File-backed realm.
    File(FileRealm),
}

impl Realm {
    /// Returns the config-backed realm, if this is one.
    #[must_use]
    pub const fn as_config(&self) -> Option<&ConfigRealm> {
        match self {
            Self::Config(realm) => Some(realm),
            Self::File(_) => None,
        }
    }

    /// Returns the file-backed realm, if this is one.
    #[must_use]
    pub const fn as_file(&self) -> Option<&FileRealm> {
        match self {
            Self::File(realm) => Some(realm),
            Self::Config(_) => None,
        }
    }

    fn inner(&self) -> &dyn SecurityRealm {
        match self {
            Self::Config(realm) => realm,
            Self::File(realm) => realm,
        }
    }
}

impl From<ConfigRealm> for Realm {
    fn from(realm: ConfigRealm) -> Self {
        Self::Config(realm)
    }
}

impl From<FileRealm> for Realm {
    fn from(realm: FileRealm) -> Self {
        Self::File(realm)
    }
}

impl SecurityRealm for Realm {
    fn kind(&self) -> RealmKind {
        self.inner().kind()
    }

    fn state(&self) -> RealmState {
        self.inner().state()
    }

    fn realm_name(&self) -> String {
        self.inner().realm_name()
    }

    fn provider(&self) -> &ProviderHandle {
        self.inner().provider()
    }

    fn lookup(&self, name: &str) -> RealmResult<Option<Arc<Identity>>> {
        self.inner().lookup(name)
    }

    fn identity_count(&self) -> RealmResult<usize> {
        self.inner().identity_count()
    }

    fn verify_password(
        &self,
        name: &str,
        password: &str,
    ) -> RealmResult<Option<AuthenticatedIdentity>> {
        self.inner().verify_password(name, password)
    }
}
