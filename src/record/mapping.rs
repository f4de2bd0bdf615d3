use std::collections::HashMap;

use serde::Deserialize;

use crate::{domain::Key, record::field};

/// A row of the functional mapping: which function (and SI) a requirement
/// belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRecord {
    /// Requirement number; the join key against [`SreqRecord`](crate::record::SreqRecord).
    #[serde(default, deserialize_with = "field::key")]
    pub sreq_number: Option<Key>,
    /// Function the requirement is allocated to.
    #[serde(default, deserialize_with = "field::key")]
    pub fun_name: Option<Key>,
    /// Name of the SI the function belongs to.
    #[serde(default, deserialize_with = "field::text")]
    pub si_name: Option<String>,
}

/// Where a requirement is placed in the function view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTarget {
    /// Function name.
    pub function: Key,
    /// SI name recorded in the mapping, if any.
    pub si_name: Option<String>,
}

/// Index from requirement number to its function allocation.
///
/// Rows without a requirement number or a function name are ignored, so the
/// requirements they mention count as unmapped. When a requirement is listed
/// more than once the last row wins.
#[derive(Debug, Clone, Default)]
pub struct FunctionalMapping {
    targets: HashMap<Key, FunctionTarget>,
}

impl FunctionalMapping {
    /// Builds the index from mapping rows.
    #[must_use]
    pub fn from_records(records: &[MappingRecord]) -> Self {
        let targets = records
            .iter()
            .filter_map(|record| {
                let number = record.sreq_number.clone()?;
                let function = record.fun_name.clone()?;
                Some((
                    number,
                    FunctionTarget {
                        function,
                        si_name: record.si_name.clone(),
                    },
                ))
            })
            .collect();
        Self { targets }
    }

    /// Looks up the function allocation of a requirement.
    #[must_use]
    pub fn get(&self, sreq_number: &str) -> Option<&FunctionTarget> {
        self.targets.get(sreq_number)
    }

    /// Number of mapped requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no requirement is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(number: &str, function: Option<&str>) -> MappingRecord {
        MappingRecord {
            sreq_number: Key::new(number).ok(),
            fun_name: function.and_then(|f| Key::new(f).ok()),
            si_name: Some("Alpha".to_string()),
        }
    }

    #[test]
    fn rows_without_function_are_ignored() {
        let mapping =
            FunctionalMapping::from_records(&[row("R1", Some("Navigate")), row("R2", None)]);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("R1").map(|t| t.function.as_str()), Some("Navigate"));
        assert!(mapping.get("R2").is_none());
    }

    #[test]
    fn last_row_wins() {
        let mapping = FunctionalMapping::from_records(&[
            row("R1", Some("Navigate")),
            row("R1", Some("Report")),
        ]);
        assert_eq!(mapping.get("R1").map(|t| t.function.as_str()), Some("Report"));
    }
}
