use std::collections::HashMap;

use serde::Deserialize;

use crate::record::field;

/// A row of the TIN → service lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceRow {
    /// TIN identifier; used as the service name.
    #[serde(rename = "TIN", default, deserialize_with = "field::text")]
    pub tin: Option<String>,
    /// SI the TIN belongs to.
    #[serde(rename = "SI", default, deserialize_with = "field::text")]
    pub si: Option<String>,
    /// TIN title, matched against an IER record's `tinName`.
    #[serde(rename = "Title", default, deserialize_with = "field::text")]
    pub title: Option<String>,
    /// TIN type.
    #[serde(rename = "TIN_TYPE", default, deserialize_with = "field::text")]
    pub tin_type: Option<String>,
}

/// Resolves TIN titles to service names.
///
/// The first row seen for a title wins.
#[derive(Debug, Clone, Default)]
pub struct ServiceLookup {
    by_title: HashMap<String, String>,
}

impl ServiceLookup {
    /// Builds the lookup from table rows. Rows without a title or TIN are
    /// skipped.
    #[must_use]
    pub fn from_rows(rows: &[ServiceRow]) -> Self {
        let mut by_title = HashMap::with_capacity(rows.len());
        for row in rows {
            if let (Some(title), Some(tin)) = (&row.title, &row.tin) {
                by_title
                    .entry(title.clone())
                    .or_insert_with(|| tin.clone());
            }
        }
        Self { by_title }
    }

    /// Resolves a TIN title to its service, or the empty string when there is
    /// no match.
    #[must_use]
    pub fn resolve(&self, tin_name: Option<&str>) -> &str {
        tin_name
            .and_then(|title| self.by_title.get(title))
            .map_or("", String::as_str)
    }
}
