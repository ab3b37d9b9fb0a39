//! # idr-realm
//!
//! Security realms backed by configuration maps or by users/roles
//! properties resources.
//!
//! A realm is created unloaded, populated once, and then serves read-only
//! lookups and password checks from an immutable identity map that is
//! published atomically. A realm that failed to load refuses every lookup.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - IA-2: Identification and authentication
//! - IA-5: Authenticator management (clear and digest credentials)
//! - AU-2: Load and authentication events on the audit target

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod error;
pub mod file;
pub mod memory;
pub mod properties;
pub mod realm;
pub mod recorder;
pub mod resolver;

pub use builder::{build_identity_map, IdentityMap, IdentityMapBuilder};
pub use error::{RealmError, RealmResult};
pub use file::{FileRealm, FileRealmSettings};
pub use memory::ConfigRealm;
pub use properties::{Properties, PropertiesError, PropertyEntry};
pub use realm::{AuthenticatedIdentity, LoadSummary, Realm, RealmKind, RealmState, SecurityRealm};
pub use recorder::{LoadTask, RealmRecorder};
pub use resolver::{ChainResolver, FileSystemResolver, MemoryResolver, ResourceResolver, ResourceStream};
