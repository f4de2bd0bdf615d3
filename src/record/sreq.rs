use serde::Deserialize;

use crate::{domain::Key, record::field};

/// A flat requirement/test-case row from the requirements export.
///
/// One row links a single test case (or none) to a single requirement and
/// carries the full grouping path above it. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SreqRecord {
    /// System interface number. Required by every requirement view.
    #[serde(default, deserialize_with = "field::key")]
    pub si_number: Option<Key>,
    /// System interface name.
    #[serde(default, deserialize_with = "field::text")]
    pub si_name: Option<String>,
    /// Technical interface number. Required by the TIN view.
    #[serde(default, deserialize_with = "field::key")]
    pub tin_number: Option<Key>,
    /// Technical interface name.
    #[serde(default, deserialize_with = "field::text")]
    pub tin_name: Option<String>,
    /// Exchange point number.
    #[serde(default, deserialize_with = "field::key")]
    pub ep_number: Option<Key>,
    /// Exchange point name. Stands in for the number when that is absent.
    #[serde(default, deserialize_with = "field::text")]
    pub ep_name: Option<String>,
    /// Requirement number. Required by every requirement view.
    #[serde(default, deserialize_with = "field::key")]
    pub sreq_number: Option<Key>,
    /// Requirement name.
    #[serde(default, deserialize_with = "field::text")]
    pub sreq_name: Option<String>,
    /// Actor exercising the test case; may be an id resolved through
    /// [`ActorNames`](crate::record::ActorNames).
    #[serde(default, deserialize_with = "field::text")]
    pub actor: Option<String>,
    /// Test case key. Rows without one describe an uncovered requirement.
    #[serde(default, deserialize_with = "field::key")]
    pub test_case_key: Option<Key>,
    /// Test case name.
    #[serde(default, deserialize_with = "field::text")]
    pub test_case_name: Option<String>,
    /// Coverage type; `tdp` means coverage through a dependency.
    #[serde(default, deserialize_with = "field::text")]
    pub coverage_type: Option<String>,
    /// Requirement status.
    #[serde(default, deserialize_with = "field::text")]
    pub status: Option<String>,
}

impl SreqRecord {
    /// Key of the exchange point: its number, or else its name.
    #[must_use]
    pub fn exchange_point_key(&self) -> Option<Key> {
        self.ep_number.clone().or_else(|| {
            self.ep_name
                .as_deref()
                .and_then(|name| Key::new(name).ok())
        })
    }

    /// Display name of the exchange point.
    ///
    /// Empty when the name already serves as the key.
    #[must_use]
    pub fn exchange_point_name(&self) -> &str {
        if self.ep_number.is_some() {
            self.ep_name.as_deref().unwrap_or_default()
        } else {
            ""
        }
    }
}
