//! Record classification: which flat records take part in a hierarchy.
//!
//! Three rules apply:
//!
//! - the global status/coverage filter ([`RecordFilter`]);
//! - the cross-dataset rule, which keeps test cases already reported under
//!   IER coverage out of the requirement tree ([`IerTestCaseIndex`]);
//! - the asterisk rule, which drops IER entries superseded by an asterisked
//!   entry for the same IDP ([`AsteriskIdps`]).
//!
//! The last two are two-pass: the auxiliary set is computed over the whole
//! input first, then applied per record.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    domain::{Config, Key},
    record::{IerRecord, SreqRecord},
};

/// Separator between the IDP part and the TIN part of `idpTinName`.
const IDP_SEPARATOR: &str = " -> ";

/// Marker for the authoritative entry of an IDP.
const ASTERISK: char = '*';

/// Access to the fields the global filter looks at.
pub trait Filterable {
    /// The record's status, if it has one.
    fn status(&self) -> Option<&str>;

    /// The record's coverage type, if it has one.
    fn coverage_type(&self) -> Option<&str>;
}

impl Filterable for SreqRecord {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn coverage_type(&self) -> Option<&str> {
        self.coverage_type.as_deref()
    }
}

impl Filterable for IerRecord {
    fn status(&self) -> Option<&str> {
        self.effective_status()
    }

    fn coverage_type(&self) -> Option<&str> {
        self.coverage_type.as_deref()
    }
}

/// The global status/coverage filter.
///
/// A record is excluded when its status or coverage type is on the
/// configured exclusion list. Missing fields never exclude a record.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    excluded_statuses: BTreeSet<String>,
    excluded_coverage_types: BTreeSet<String>,
}

impl RecordFilter {
    /// Builds the filter from the configured exclusion lists.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            excluded_statuses: config.excluded_statuses().iter().cloned().collect(),
            excluded_coverage_types: config.excluded_coverage_types().iter().cloned().collect(),
        }
    }

    /// Returns `true` if the record takes part in aggregation.
    #[must_use]
    pub fn includes(&self, record: &impl Filterable) -> bool {
        let excluded_status = record
            .status()
            .is_some_and(|status| self.excluded_statuses.contains(status));
        let excluded_coverage = record
            .coverage_type()
            .is_some_and(|coverage| self.excluded_coverage_types.contains(coverage));
        !(excluded_status || excluded_coverage)
    }
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Test case keys already reported under IER coverage.
///
/// Built from the whole IER input. Only the first name seen per key is kept.
///
/// IER rows that the status/coverage filter or the asterisk rule later drop
/// from the IER view still count here, so such a test case appears in
/// neither hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IerTestCaseIndex {
    names: BTreeMap<Key, String>,
}

impl IerTestCaseIndex {
    /// Scans the IER records once.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a IerRecord>) -> Self {
        let mut names = BTreeMap::new();
        for record in records {
            if let Some(key) = &record.test_case_key {
                names
                    .entry(key.clone())
                    .or_insert_with(|| record.test_case_name.clone().unwrap_or_default());
            }
        }
        Self { names }
    }

    /// Returns `true` if the test case is already covered by an IER.
    #[must_use]
    pub fn contains(&self, test_case_key: &str) -> bool {
        self.names.contains_key(test_case_key)
    }

    /// The first name recorded for a test case key.
    #[must_use]
    pub fn name(&self, test_case_key: &str) -> Option<&str> {
        self.names.get(test_case_key).map(String::as_str)
    }

    /// Number of distinct test case keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no IER test case was seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Extracts the IDP identifier from an `idpTinName` label.
///
/// Takes the text before the first `" -> "`, then the token before the first
/// space: `"IDP-1242 foo -> TIN *"` yields `"IDP-1242"`.
#[must_use]
pub fn idp_of(idp_tin_name: &str) -> &str {
    let head = idp_tin_name
        .split(IDP_SEPARATOR)
        .next()
        .unwrap_or_default();
    head.split(' ').next().unwrap_or_default()
}

/// IDPs that have at least one asterisked representative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsteriskIdps {
    idps: BTreeSet<String>,
}

impl AsteriskIdps {
    /// First pass: collect the IDP of every record whose `idpTinName`
    /// contains `*`.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a IerRecord>) -> Self {
        let idps = records
            .into_iter()
            .filter_map(|record| record.idp_tin_name.as_deref())
            .filter(|label| label.contains(ASTERISK))
            .map(|label| idp_of(label).to_string())
            .collect();
        Self { idps }
    }

    /// Second pass: is this record kept under the asterisk rule?
    ///
    /// Records without a label, asterisked records, and records whose IDP has
    /// no asterisked representative are kept. Everything else is a redundant
    /// entry and is dropped.
    #[must_use]
    pub fn includes(&self, record: &IerRecord) -> bool {
        match record.idp_tin_name.as_deref() {
            None | Some("") => true,
            Some(label) if label.contains(ASTERISK) => true,
            Some(label) => !self.idps.contains(idp_of(label)),
        }
    }

    /// Returns `true` if the IDP has an asterisked representative.
    #[must_use]
    pub fn contains(&self, idp: &str) -> bool {
        self.idps.contains(idp)
    }
}
