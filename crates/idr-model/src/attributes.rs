//! Multi-valued identity attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute key under which role names are stored.
pub const GROUPS: &str = "groups";

/// Mapping from attribute key to an ordered list of values.
///
/// Values keep their insertion order within a key; keys are kept sorted so
/// two attribute sets with the same content compare and print identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    entries: BTreeMap<String, Vec<String>>,
}

impl Attributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends several values to the given key, in order.
    pub fn add_all<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(key.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Returns the values stored under a key. Missing keys yield an empty slice.
    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[][..], Vec::as_slice)
    }
}
