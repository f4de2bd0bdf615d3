//! Flat input records and dataset parsing.
//!
//! Datasets arrive as JSON arrays of objects. Parsing is all-or-nothing: a
//! dataset that is not an array of records fails with a [`DataFormatError`]
//! before any aggregation happens, so no partially built hierarchy is ever
//! observed.

mod actors;
mod field;
mod ier;
mod mapping;
mod service;
mod sreq;

pub use actors::ActorNames;
pub use ier::IerRecord;
pub use mapping::{FunctionTarget, FunctionalMapping, MappingRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;
pub use service::{ServiceLookup, ServiceRow};
pub use sreq::SreqRecord;

use self::field::value_kind;

/// Input that is not a well-formed sequence of records.
///
/// This is fatal for the run it occurs in.
#[derive(Debug, thiserror::Error)]
pub enum DataFormatError {
    /// The dataset is not valid JSON.
    #[error("{dataset}: invalid JSON")]
    Json {
        /// Name of the dataset being parsed.
        dataset: &'static str,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// The dataset is not a JSON array.
    #[error("{dataset}: expected an array of records, found {found}")]
    NotAnArray {
        /// Name of the dataset being parsed.
        dataset: &'static str,
        /// What was found instead.
        found: &'static str,
    },
    /// The dataset is not a JSON object.
    #[error("{dataset}: expected an object, found {found}")]
    NotAnObject {
        /// Name of the dataset being parsed.
        dataset: &'static str,
        /// What was found instead.
        found: &'static str,
    },
    /// An element of the dataset is not a record.
    #[error("{dataset}[{index}]: expected a record, found {found}")]
    NotARecord {
        /// Name of the dataset being parsed.
        dataset: &'static str,
        /// Position of the element in the array.
        index: usize,
        /// What was found instead.
        found: &'static str,
    },
    /// A record has a field of an unusable type.
    #[error("{dataset}[{index}]: invalid record")]
    InvalidRecord {
        /// Name of the dataset being parsed.
        dataset: &'static str,
        /// Position of the record in the array.
        index: usize,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// An actor snapshot maps an id to something other than a name.
    #[error("actors: name for '{id}' must be a string, found {found}")]
    InvalidActor {
        /// The actor id.
        id: String,
        /// What was found instead.
        found: &'static str,
    },
}

/// Parses a JSON value holding an array of records.
///
/// # Errors
///
/// Returns a [`DataFormatError`] if the value is not an array, if an element
/// is not an object, or if a field holds a structured value where a scalar
/// is expected.
pub fn parse_records<T: DeserializeOwned>(
    dataset: &'static str,
    value: Value,
) -> Result<Vec<T>, DataFormatError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DataFormatError::NotAnArray {
                dataset,
                found: value_kind(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(DataFormatError::NotARecord {
                    dataset,
                    index,
                    found: value_kind(&item),
                });
            }
            serde_json::from_value(item).map_err(|source| DataFormatError::InvalidRecord {
                dataset,
                index,
                source,
            })
        })
        .collect()
}

/// Parses JSON text holding an array of records.
///
/// # Errors
///
/// Returns a [`DataFormatError`] if the text is not valid JSON or does not
/// hold an array of records.
pub fn parse_records_str<T: DeserializeOwned>(
    dataset: &'static str,
    json: &str,
) -> Result<Vec<T>, DataFormatError> {
    let value = serde_json::from_str(json)
        .map_err(|source| DataFormatError::Json { dataset, source })?;
    parse_records(dataset, value)
}

/// Every dataset consumed by one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    /// Requirement/test-case rows.
    pub sreq: Vec<SreqRecord>,
    /// IER/test-case rows.
    pub ier: Vec<IerRecord>,
    /// Functional mapping rows. Without them no function view is built.
    pub mapping: Option<Vec<MappingRecord>>,
    /// TIN → service lookup rows.
    pub services: Vec<ServiceRow>,
}

impl Inputs {
    /// Parses every dataset from JSON values.
    ///
    /// # Errors
    ///
    /// Returns the first [`DataFormatError`] encountered; nothing is returned
    /// for the datasets that did parse.
    pub fn from_json(
        sreq: Value,
        ier: Value,
        mapping: Option<Value>,
        services: Option<Value>,
    ) -> Result<Self, DataFormatError> {
        Ok(Self {
            sreq: parse_records("sreq", sreq)?,
            ier: parse_records("ier", ier)?,
            mapping: mapping
                .map(|value| parse_records("mapping", value))
                .transpose()?,
            services: services
                .map(|value| parse_records("services", value))
                .transpose()?
                .unwrap_or_default(),
        })
    }
}
