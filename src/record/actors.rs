use std::collections::HashMap;

use serde_json::Value;

use crate::record::{DataFormatError, field::value_kind};

/// A read-only snapshot of actor ids to display names.
///
/// Callers own the live table; the aggregator only ever reads a snapshot of
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorNames {
    names: HashMap<String, String>,
}

impl ActorNames {
    /// Parses a snapshot from a JSON object of `id -> name`.
    ///
    /// # Errors
    ///
    /// Returns a [`DataFormatError`] if the value is not an object whose
    /// values are strings.
    pub fn from_json(value: Value) -> Result<Self, DataFormatError> {
        const DATASET: &str = "actors";

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(DataFormatError::NotAnObject {
                    dataset: DATASET,
                    found: value_kind(&other),
                });
            }
        };

        let names = map
            .into_iter()
            .map(|(id, name)| match name {
                Value::String(name) => Ok((id, name)),
                other => Err(DataFormatError::InvalidActor {
                    id,
                    found: value_kind(&other),
                }),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { names })
    }

    /// The display name for an actor, or the actor itself when unknown.
    #[must_use]
    pub fn resolve<'a>(&'a self, actor: &'a str) -> &'a str {
        self.names.get(actor).map_or(actor, String::as_str)
    }
}

impl FromIterator<(String, String)> for ActorNames {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_known_ids() {
        let names = ActorNames::from_json(json!({"u-1": "Operator"})).unwrap();
        assert_eq!(names.resolve("u-1"), "Operator");
        assert_eq!(names.resolve("u-2"), "u-2");
    }

    #[test]
    fn rejects_non_object() {
        let error = ActorNames::from_json(json!(["u-1"])).unwrap_err();
        assert!(matches!(error, DataFormatError::NotAnObject { .. }));
    }

    #[test]
    fn rejects_non_string_names() {
        let error = ActorNames::from_json(json!({"u-1": 3})).unwrap_err();
        assert!(matches!(error, DataFormatError::InvalidActor { .. }));
    }
}
