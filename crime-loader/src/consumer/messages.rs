//! Row type produced by the consumer.

use csv::StringRecord;

/// One data row read from the input CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the input file (the header is line 1).
    pub line: u64,
    /// Raw field values in file order.
    pub fields: StringRecord,
}

impl CsvRow {
    /// Create a row from any sequence of string values.
    pub fn new<T: AsRef<str>>(line: u64, fields: Vec<T>) -> Self {
        Self {
            line,
            fields: StringRecord::from(fields),
        }
    }

    /// The value at a 0-based column index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index)
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
