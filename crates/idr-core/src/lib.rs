//! # idr-core
//!
//! Configuration, error handling and audit events shared by the identity
//! realm crates.
//!
//! ## NIST 800-53 Rev5 Controls
//!
//! - AU-2: Event logging framework
//! - SI-11: Error handling

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::{
    EmbeddedRealmConfig, PropertiesEncoding, PropertiesRealmConfig, RealmConfig, SecurityConfig,
};
pub use error::{Error, Result};
pub use event::{Event, EventOutcome, EventType};
