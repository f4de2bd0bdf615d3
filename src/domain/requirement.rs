use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::domain::{
    Key, TestCase,
    merge::{Merge, Upsert, merge_optional, merge_scalar},
};

/// Lifecycle status of a requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Status {
    /// The requirement is in force.
    #[default]
    Active,
    /// The requirement has been withdrawn.
    Deprecated,
    /// The requirement has not been approved yet.
    Draft,
}

impl Status {
    /// Interprets a raw status field.
    ///
    /// Anything other than `Deprecated` or `Draft`, including an absent
    /// field, reads as [`Status::Active`].
    #[must_use]
    pub fn from_field(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Deprecated") => Self::Deprecated,
            Some("Draft") => Self::Draft,
            _ => Self::Active,
        }
    }

    /// The canonical spelling of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Deprecated => "Deprecated",
            Self::Draft => "Draft",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A system requirement (SREQ) and the test cases that verify it.
///
/// A requirement sits under exactly one grouping node per view: an exchange
/// point in the TIN view, or a function in the function view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Requirement number.
    pub number: Key,
    /// Free-text requirement name.
    pub name: String,
    /// Last status seen for this requirement.
    pub status: Status,
    /// Last actor seen for this requirement, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    /// Test cases keyed by test case key.
    pub test_cases: BTreeMap<Key, TestCase>,
}

impl Requirement {
    /// Creates a requirement with no test cases.
    #[must_use]
    pub const fn new(number: Key, name: String, status: Status) -> Self {
        Self {
            number,
            name,
            status,
            actor: None,
            test_cases: BTreeMap::new(),
        }
    }

    /// Overwrite the scalar attributes with the values of a later record.
    ///
    /// Empty names and absent actors leave the current values in place.
    pub fn update(&mut self, name: String, status: Status, actor: Option<String>) {
        merge_scalar(&mut self.name, name);
        self.status = status;
        merge_optional(&mut self.actor, actor);
    }

    /// Returns the test case with the given key, creating it if needed.
    pub fn upsert_test_case(&mut self, key: Key, name: String) -> &mut TestCase {
        let test_case = self
            .test_cases
            .upsert(key.clone(), || TestCase::new(key, String::new()));
        merge_scalar(&mut test_case.name, name);
        test_case
    }

    /// Number of test cases attached to this requirement.
    #[must_use]
    pub fn test_case_count(&self) -> usize {
        self.test_cases.len()
    }
}

impl Merge for Requirement {
    fn merge(&mut self, other: Self) {
        self.update(other.name, other.status, other.actor);
        self.test_cases.merge_all(other.test_cases);
    }
}
