use serde::Deserialize;

use crate::{domain::Key, record::field};

/// A flat IER/test-case row from the interface exchange export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IerRecord {
    /// Programmatic interface number. Required.
    #[serde(default, deserialize_with = "field::key")]
    pub pi_number: Option<Key>,
    /// Programmatic interface name.
    #[serde(default, deserialize_with = "field::text")]
    pub pi_name: Option<String>,
    /// IER number. Required.
    #[serde(default, deserialize_with = "field::key")]
    pub ier_number: Option<Key>,
    /// IER name.
    #[serde(default, deserialize_with = "field::text")]
    pub ier_name: Option<String>,
    /// Technical interface title, resolved to a service through the lookup
    /// table.
    #[serde(default, deserialize_with = "field::text")]
    pub tin_name: Option<String>,
    /// Combined `IDP-n -> TIN` label; a `*` marks the authoritative entry
    /// for its IDP.
    #[serde(default, deserialize_with = "field::text")]
    pub idp_tin_name: Option<String>,
    /// Test case key.
    #[serde(default, deserialize_with = "field::key")]
    pub test_case_key: Option<Key>,
    /// Test case name.
    #[serde(default, deserialize_with = "field::text")]
    pub test_case_name: Option<String>,
    /// Execution state of the test case.
    #[serde(default, deserialize_with = "field::text")]
    pub test_case_state: Option<String>,
    /// Record status.
    #[serde(default, deserialize_with = "field::text")]
    pub status: Option<String>,
    /// Coverage type.
    #[serde(default, deserialize_with = "field::text")]
    pub coverage_type: Option<String>,
}

impl IerRecord {
    /// The status used for filtering: `status`, or else `testCaseState`.
    #[must_use]
    pub fn effective_status(&self) -> Option<&str> {
        self.status.as_deref().or(self.test_case_state.as_deref())
    }
}
