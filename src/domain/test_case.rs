use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::{
    Key,
    merge::{Merge, merge_scalar},
};

/// A test case exercising one or more requirements.
///
/// The same test case key may appear in many input records; all of them fold
/// into a single instance whose actors are the union of every record's actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Business key of the test case (e.g. `TC-1`).
    pub key: Key,
    /// Display name of the test case.
    pub name: String,
    /// Names of the actors that exercise this test case.
    pub actors: BTreeSet<String>,
    /// Raw attributes carried over from the source records (e.g. `state`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl TestCase {
    /// Creates a test case with no actors or attributes.
    #[must_use]
    pub const fn new(key: Key, name: String) -> Self {
        Self {
            key,
            name,
            actors: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an actor to the test case.
    ///
    /// Returns `true` if the actor was not already present.
    pub fn add_actor(&mut self, actor: impl Into<String>) -> bool {
        self.actors.insert(actor.into())
    }

    /// Record a raw attribute. Empty values are ignored.
    pub fn set_attribute(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.attributes.insert(name.to_string(), value);
        }
    }
}

impl Merge for TestCase {
    fn merge(&mut self, other: Self) {
        merge_scalar(&mut self.name, other.name);
        self.actors.extend(other.actors);
        for (name, value) in other.attributes {
            self.set_attribute(&name, Some(value));
        }
    }
}
