//! CSV consumer implementation for the complaint loader.
//!
//! Opens the complaint file, reads its header line and hands out the data
//! rows one at a time. Nothing is buffered beyond the current record.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord, StringRecordsIntoIter};
use tracing::{debug, info};

use crate::consumer::messages::CsvRow;
use crate::errors::IngestError;

/// An opened complaint file whose header has been read.
///
/// The file handle is owned by the consumer and closed when it (or the row
/// iterator it turns into) is dropped, on success and failure paths alike.
#[derive(Debug)]
pub struct CsvConsumer {
    path: PathBuf,
    reader: Reader<File>,
    header: StringRecord,
}

impl CsvConsumer {
    /// Open a CSV file and read its header line.
    ///
    /// # Returns
    ///
    /// * `Ok(CsvConsumer)` - Positioned at the first data row
    /// * `Err(IngestError::Io)` - If the file cannot be opened or read
    /// * `Err(IngestError::EmptyFile)` - If the file has zero lines
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref().to_path_buf();

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|e| IngestError::io(format!("Failed to open {}: {}", path.display(), e)))?;

        let mut header = StringRecord::new();
        let has_header = reader.read_record(&mut header).map_err(|e| {
            IngestError::io(format!("Failed to read header of {}: {}", path.display(), e))
        })?;

        if !has_header {
            return Err(IngestError::EmptyFile(path.display().to_string()));
        }

        info!(
            path = %path.display(),
            columns = header.len(),
            "Opened complaint file"
        );

        Ok(Self {
            path,
            reader,
            header,
        })
    }

    /// The header line.
    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    /// Path of the opened file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn the consumer into a lazy iterator over the data rows.
    ///
    /// The iterator is single-pass; reading the file again requires opening
    /// a new consumer.
    pub fn rows(self) -> CsvRows {
        debug!(path = %self.path.display(), "Streaming complaint rows");
        CsvRows {
            records: self.reader.into_records(),
        }
    }
}

/// Lazy iterator over the data rows of a [`CsvConsumer`].
pub struct CsvRows {
    records: StringRecordsIntoIter<File>,
}

impl Iterator for CsvRows {
    type Item = Result<CsvRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map_err(IngestError::from).map(|fields| {
            let line = fields.position().map(|p| p.line()).unwrap_or(0);
            CsvRow { line, fields }
        }))
    }
}
