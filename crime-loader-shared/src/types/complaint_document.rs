//! Complaint document type for the search index.
//!
//! A [`ComplaintDocument`] is what one CSV data row becomes after the field
//! mapping is applied. Values are kept as raw strings; the backend parses
//! dates, floats and geo points according to the index mapping.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One indexed crime complaint record.
///
/// Fields are kept in mapping order and serialize as a JSON object in that
/// order. A `None` value serializes as `null`; only the geo_point field is
/// ever `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintDocument {
    fields: Vec<(String, Option<String>)>,
}

impl ComplaintDocument {
    /// Create an empty document with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a field. Callers are responsible for field name uniqueness;
    /// the field mapping guarantees it for documents built by the processor.
    pub fn push(&mut self, field_name: impl Into<String>, value: Option<String>) {
        self.fields.push((field_name.into(), value));
    }

    /// The value of a field, or `None` if the field is absent or null.
    pub fn get(&self, field_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field_name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Whether the document has a field with this name (null or not).
    pub fn contains_field(&self, field_name: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field_name)
    }

    /// Whether the field is present and null.
    pub fn is_null(&self, field_name: &str) -> bool {
        self.fields
            .iter()
            .any(|(name, value)| name == field_name && value.is_none())
    }

    /// Field names in document order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ComplaintDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
