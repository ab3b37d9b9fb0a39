//! Realm error types.
//!
//! ## NIST 800-53 Rev5: AU-2 (Event Logging)
//!
//! Load failures carry enough context (resource, line, configuration key)
//! for an operator to fix the deployment, and never the secret values read
//! from a users file.

use std::io;

use thiserror::Error;

/// Errors that can occur while building, loading or querying a realm.
#[derive(Debug, Error)]
pub enum RealmError {
    /// A configured user has no roles entry.
    #[error("no roles entry for user '{user}'")]
    MissingRoleMapping {
        /// User name.
        user: String,
    },

    /// Neither the users nor the roles resource could be found.
    #[error("no users/roles resources found for the properties realm; configure {}", .keys.join(" and "))]
    RealmConfigurationMissing {
        /// Configuration keys the caller has to set.
        keys: Vec<&'static str>,
    },

    /// Exactly one of the two resources could be found.
    #[error("properties realm resource '{resource}' not found; check {key}")]
    PartialRealmConfiguration {
        /// Name of the missing resource.
        resource: String,
        /// Configuration key naming the resource.
        key: &'static str,
    },

    /// A resource line could not be turned into a realm entry.
    #[error("malformed entry in '{resource}' at line {line}: {detail}")]
    MalformedRealmEntry {
        /// Resource name.
        resource: String,
        /// 1-based line number where the logical line starts.
        line: usize,
        /// What was wrong with it.
        detail: String,
    },

    /// Reading a resolved resource failed.
    #[error("failed to read realm resource '{resource}': {source}")]
    RealmResourceReadError {
        /// Resource name.
        resource: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The realm has not been loaded yet.
    #[error("realm '{0}' has not been loaded")]
    NotLoaded(String),

    /// A previous load failed; the realm is unusable.
    #[error("realm '{0}' failed to load and cannot serve lookups")]
    LoadFailed(String),

    /// The operation is not allowed in the realm's current state.
    #[error("invalid realm state: {0}")]
    InvalidState(String),

    /// A load was requested with configuration for another realm kind.
    #[error("realm kind mismatch: realm is {realm}, configuration is {config}")]
    RealmKindMismatch {
        /// Kind of the realm instance.
        realm: &'static str,
        /// Kind of the supplied configuration.
        config: &'static str,
    },

    /// Configuration error from the core layer.
    #[error(transparent)]
    Config(#[from] idr_core::Error),
}

impl RealmError {
    /// Creates a malformed-entry error.
    #[must_use]
    pub fn malformed(resource: impl Into<String>, line: usize, detail: impl Into<String>) -> Self {
        Self::MalformedRealmEntry {
            resource: resource.into(),
            line,
            detail: detail.into(),
        }
    }

    /// Creates a read error for a resource.
    #[must_use]
    pub fn read(resource: impl Into<String>, source: io::Error) -> Self {
        Self::RealmResourceReadError {
            resource: resource.into(),
            source,
        }
    }

    /// Checks if the error points at deployment configuration rather than
    /// at resource content or I/O.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRoleMapping { .. }
                | Self::RealmConfigurationMissing { .. }
                | Self::PartialRealmConfiguration { .. }
                | Self::RealmKindMismatch { .. }
                | Self::Config(_)
        )
    }

    /// Checks if the error is a lookup refused because the realm is not in
    /// a usable state.
    #[must_use]
    pub const fn is_fail_closed(&self) -> bool {
        matches!(self, Self::NotLoaded(_) | Self::LoadFailed(_))
    }
}

/// Result type for realm operations.
pub type RealmResult<T> = Result<T, RealmError>;
