//! Resolution of mapped fields to CSV column indices.

use std::collections::HashMap;

use crime_loader_shared::FieldMapping;
use csv::StringRecord;
use serde::Deserialize;
use tracing::debug;

use crate::errors::IngestError;

const UTF8_BOM: char = '\u{feff}';

/// How mapped fields are located in a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnResolution {
    /// Look up each source column by name in the header line.
    #[default]
    Header,
    /// Use the fixed positions of the 36-column layout.
    Positional,
}

/// Column index for every field of a mapping, in mapping order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    indices: Vec<usize>,
}

impl ColumnLayout {
    /// Layout that trusts the fixed positions in the mapping.
    pub fn positional(mapping: &FieldMapping) -> Self {
        Self {
            indices: mapping.iter().map(|spec| spec.position).collect(),
        }
    }

    /// Layout resolved from the header line.
    ///
    /// Header cells are trimmed and a leading byte order mark is ignored.
    /// Every mapped source column must appear exactly once; columns the
    /// mapping does not name are ignored.
    pub fn from_header(header: &StringRecord, mapping: &FieldMapping) -> Result<Self, IngestError> {
        let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(header.len());
        let mut duplicated = Vec::new();

        for (i, cell) in header.iter().enumerate() {
            let name = if i == 0 {
                cell.trim_start_matches(UTF8_BOM).trim()
            } else {
                cell.trim()
            };
            if by_name.insert(name, i).is_some() {
                duplicated.push(name);
            }
        }

        let ambiguous: Vec<&str> = mapping
            .iter()
            .map(|spec| spec.source_column.as_str())
            .filter(|name| duplicated.contains(name))
            .collect();
        if !ambiguous.is_empty() {
            return Err(IngestError::schema(format!(
                "Header repeats mapped column(s): {}",
                ambiguous.join(", ")
            )));
        }

        let mut indices = Vec::with_capacity(mapping.len());
        let mut missing = Vec::new();
        for spec in mapping.iter() {
            match by_name.get(spec.source_column.as_str()) {
                Some(&i) => indices.push(i),
                None => missing.push(spec.source_column.as_str()),
            }
        }

        if !missing.is_empty() {
            return Err(IngestError::schema(format!(
                "Header is missing mapped column(s): {}",
                missing.join(", ")
            )));
        }

        debug!(columns = header.len(), mapped = indices.len(), "Resolved header layout");

        Ok(Self { indices })
    }

    /// Build the layout for the chosen resolution mode.
    pub fn resolve(
        resolution: ColumnResolution,
        header: &StringRecord,
        mapping: &FieldMapping,
    ) -> Result<Self, IngestError> {
        match resolution {
            ColumnResolution::Header => Self::from_header(header, mapping),
            ColumnResolution::Positional => Ok(Self::positional(mapping)),
        }
    }

    /// Column indices in mapping order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Minimum number of fields a row needs to cover every mapped column.
    pub fn required_len(&self) -> usize {
        self.indices.iter().max().map_or(0, |max| max + 1)
    }
}
