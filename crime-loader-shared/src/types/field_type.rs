//! Field types supported by the complaint index mapping.

use serde::{Deserialize, Serialize};

/// Date format used by the complaint dataset for `CMPLNT_FR_DT` and `RPT_DT`.
pub const DATE_FORMAT: &str = "MM/dd/yyyy";

/// The type of a mapped field as understood by the search backend.
///
/// Serializes to the backend's type name (e.g. `geo_point`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Exact-match string (codes, identifiers, descriptors).
    Keyword,
    /// Analyzed full-text string.
    Text,
    /// Calendar date in [`DATE_FORMAT`].
    Date,
    /// Numeric coordinate.
    Float,
    /// Composite latitude/longitude value.
    GeoPoint,
}

impl FieldType {
    /// Returns the backend type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Float => "float",
            FieldType::GeoPoint => "geo_point",
        }
    }

    /// Returns the value format the backend should parse with, if any.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            FieldType::Date => Some(DATE_FORMAT),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
