//! Records that expressions are evaluated against.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::schema::Metadata;
use crate::value::Value;

/// Anything that can report a typed value for a field name.
///
/// A missing field and a `Null` value are treated the same way.
pub trait Record {
    fn value(&self, field: &str) -> Option<&Value>;
}

impl<S: BuildHasher> Record for HashMap<String, Value, S> {
    fn value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl Record for BTreeMap<String, Value> {
    fn value(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn value(&self, field: &str) -> Option<&Value> {
        (**self).value(field)
    }
}

/// A record whose values were converted to their fields' types.
///
/// Keys are canonical field names, so lookups match the names stored in a
/// parsed [`crate::Condition`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRecord {
    values: BTreeMap<String, Value>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object.
    ///
    /// Keys are matched to fields case-insensitively; keys with no field are
    /// ignored, and values are converted with [`Value::from_json`]. Anything
    /// that is not an object yields an empty record.
    pub fn from_json(metadata: &Metadata, json: &serde_json::Value) -> Self {
        let Some(object) = json.as_object() else {
            return Self::default();
        };
        let values = object
            .iter()
            .filter_map(|(key, value)| {
                let field = metadata.field(key)?;
                Some((field.name.clone(), Value::from_json(field.field_type, value)))
            })
            .collect();
        Self { values }
    }

    /// Sets a field's value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Returns the underlying values.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl Record for FieldRecord {
    fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}
