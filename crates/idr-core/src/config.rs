//! Configuration for identity realms.
//!
//! Loaded from TOML. Two realm variants are configurable and exactly one of
//! them must be enabled:
//!
//! ```toml
//! [users.file]
//! enabled = true
//! realm-name = "Quarkus"
//! plain-text = false
//! users = "users.properties"
//! roles = "roles.properties"
//!
//! [users.embedded]
//! enabled = false
//! users = { alice = "secret1" }
//! roles = { alice = "admin,user" }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use idr_crypto::DigestAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration key naming the users resource of the properties realm.
pub const USERS_RESOURCE_KEY: &str = "security.users.file.users";

/// Configuration key naming the roles resource of the properties realm.
pub const ROLES_RESOURCE_KEY: &str = "security.users.file.roles";

/// Realm name used when none is configured.
pub const DEFAULT_REALM_NAME: &str = "Quarkus";

/// Top-level security configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// User store configuration.
    #[serde(default)]
    pub users: UsersConfig,
}

/// User store configuration: one section per realm variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Properties-file realm.
    #[serde(default)]
    pub file: PropertiesRealmConfig,
    /// Embedded (in-configuration) realm.
    #[serde(default)]
    pub embedded: EmbeddedRealmConfig,
}

impl SecurityConfig {
    /// Parses configuration from a TOML string.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if the TOML is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Loads configuration from a TOML file.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if
    /// it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Selects the realm variant to build.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` unless exactly one variant is enabled.
    pub fn realm_config(&self) -> Result<RealmConfig> {
        match (self.users.file.enabled, self.users.embedded.enabled) {
            (true, false) => Ok(RealmConfig::Properties(self.users.file.clone())),
            (false, true) => Ok(RealmConfig::Embedded(self.users.embedded.clone())),
            (true, true) => Err(Error::Config(
                "users.file and users.embedded are mutually exclusive; enable only one".to_string(),
            )),
            (false, false) => Err(Error::Config(
                "no user store enabled; enable users.file or users.embedded".to_string(),
            )),
        }
    }
}

/// The realm variant selected by configuration.
#[derive(Debug, Clone)]
pub enum RealmConfig {
    /// Users and roles listed inline in the configuration.
    Embedded(EmbeddedRealmConfig),
    /// Users and roles read from a pair of properties resources.
    Properties(PropertiesRealmConfig),
}

impl RealmConfig {
    /// Returns a short name for the variant.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Embedded(_) => "embedded",
            Self::Properties(_) => "properties",
        }
    }
}

/// Character encoding of properties resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertiesEncoding {
    /// UTF-8.
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// ISO-8859-1, the classic properties-file encoding.
    #[serde(rename = "iso-8859-1")]
    Latin1,
}

/// Configuration of the properties-file realm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PropertiesRealmConfig {
    /// Whether this realm is enabled.
    pub enabled: bool,
    /// Default realm name, used as digest salt when the users file does not
    /// declare one.
    pub realm_name: String,
    /// Whether users-file values are clear-text passwords.
    pub plain_text: bool,
    /// Name of the users resource.
    pub users: String,
    /// Name of the roles resource.
    pub roles: String,
    /// Encoding of both resources.
    pub encoding: PropertiesEncoding,
    /// Digest algorithm for untagged users-file values.
    pub digest_algorithm: DigestAlgorithm,
}

impl Default for PropertiesRealmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            realm_name: DEFAULT_REALM_NAME.to_string(),
            plain_text: false,
            users: "users.properties".to_string(),
            roles: "roles.properties".to_string(),
            encoding: PropertiesEncoding::default(),
            digest_algorithm: DigestAlgorithm::default(),
        }
    }
}

impl PropertiesRealmConfig {
    /// Returns the configuration keys naming the two resources.
    #[must_use]
    pub const fn resource_keys() -> [&'static str; 2] {
        [USERS_RESOURCE_KEY, ROLES_RESOURCE_KEY]
    }
}

/// Configuration of the embedded realm.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EmbeddedRealmConfig {
    /// Whether this realm is enabled.
    pub enabled: bool,
    /// Realm name reported with authenticated identities.
    pub realm_name: String,
    /// User name to clear-text password.
    pub users: BTreeMap<String, String>,
    /// User name to comma-separated roles.
    pub roles: BTreeMap<String, String>,
}

impl Default for EmbeddedRealmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            realm_name: DEFAULT_REALM_NAME.to_string(),
            users: BTreeMap::new(),
            roles: BTreeMap::new(),
        }
    }
}

// Passwords stay out of logs; only user names are printed.
impl fmt::Debug for EmbeddedRealmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedRealmConfig")
            .field("enabled", &self.enabled)
            .field("realm_name", &self.realm_name)
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .field("roles", &self.roles)
            .finish()
    }
}
