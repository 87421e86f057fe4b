//! Row to document transformation.
//!
//! Pure: the processor does no I/O and keeps no state between rows.

use crime_loader_shared::{ComplaintDocument, FieldMapping, FieldType};

use crate::consumer::CsvRow;
use crate::errors::IngestError;
use crate::processor::ColumnLayout;

/// Turns CSV rows into complaint documents.
#[derive(Debug, Clone)]
pub struct RecordProcessor {
    mapping: FieldMapping,
    layout: ColumnLayout,
}

impl RecordProcessor {
    /// Create a processor for a mapping and a layout resolved against it.
    pub fn new(mapping: FieldMapping, layout: ColumnLayout) -> Self {
        Self { mapping, layout }
    }

    /// Build the document for one row.
    ///
    /// Values are copied verbatim. An empty geo_point cell becomes a null
    /// value; every other empty cell stays an empty string. Columns the
    /// mapping does not name are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(ComplaintDocument)` - One entry per mapped field, in mapping order
    /// * `Err(IngestError::MalformedRow)` - If the row is too short for the layout
    pub fn process(&self, row: &CsvRow) -> Result<ComplaintDocument, IngestError> {
        let required = self.layout.required_len();
        if row.len() < required {
            return Err(IngestError::short_row(row.line, required, row.len()));
        }

        let mut document = ComplaintDocument::with_capacity(self.mapping.len());
        for (spec, &index) in self.mapping.iter().zip(self.layout.indices()) {
            let raw = row.get(index).unwrap_or_default();
            let value = match spec.field_type {
                FieldType::GeoPoint if raw.is_empty() => None,
                _ => Some(raw.to_string()),
            };
            document.push(spec.field_name.as_str(), value);
        }

        Ok(document)
    }
}
