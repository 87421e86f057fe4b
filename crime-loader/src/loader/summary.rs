//! Run summary produced by the bulk loader.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::IngestError;

/// A row that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// Line in the input file, when the failure can be tied to one.
    pub line: Option<u64>,
    pub error: IngestError,
}

/// Outcome of one load run.
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub run_id: Uuid,
    pub index: String,
    pub source: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Data rows read from the file, including skipped ones.
    pub rows_read: u64,
    pub documents_indexed: u64,
    pub rows_skipped: u64,
    /// The first skipped rows, bounded by the loader's sample limit.
    pub failures: Vec<RowFailure>,
    /// Document count reported by the backend after the load.
    pub backend_count: u64,
}

impl LoadSummary {
    pub(crate) fn start(index: &str, source: &Path) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            index: index.to_string(),
            source: source.to_path_buf(),
            started_at: Utc::now(),
            finished_at: None,
            rows_read: 0,
            documents_indexed: 0,
            rows_skipped: 0,
            failures: Vec::new(),
            backend_count: 0,
        }
    }

    pub(crate) fn record_failure(&mut self, line: Option<u64>, error: IngestError, limit: usize) {
        self.rows_skipped += 1;
        if self.failures.len() < limit {
            self.failures.push(RowFailure { line, error });
        }
    }

    pub(crate) fn finish(&mut self, backend_count: u64) {
        self.backend_count = backend_count;
        self.finished_at = Some(Utc::now());
    }

    /// True when the backend holds exactly the documents this run indexed.
    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some() && self.backend_count == self.documents_indexed
    }

    /// Wall-clock duration of the run in milliseconds, once finished.
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}
