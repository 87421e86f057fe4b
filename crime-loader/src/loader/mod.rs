//! Loader module for the complaint loader.
//!
//! Streams CSV rows through the processor and indexes each resulting
//! document, one request per row, in file order.

mod summary;

pub use summary::{LoadSummary, RowFailure};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crime_loader_repository::SearchIndexService;
use crime_loader_shared::{FieldMapping, COMPLAINT_NUMBER_FIELD};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::consumer::{CsvConsumer, CsvRow};
use crate::errors::IngestError;
use crate::processor::{ColumnLayout, ColumnResolution, RecordProcessor};

/// What to do when a single row cannot be indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Abort the load on the first failing row.
    FailFast,
    /// Log and record the failure, then continue with the next row.
    #[default]
    Skip,
}

/// How document ids are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentIdStrategy {
    /// 0, 1, 2, ... counting only rows that reached the index step.
    Sequential,
    /// The row's complaint number; reruns overwrite instead of duplicating.
    #[default]
    ComplaintNumber,
}

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Emit a progress line every this many indexed documents.
    pub progress_interval: u64,
    pub row_error_policy: RowErrorPolicy,
    pub document_id: DocumentIdStrategy,
    /// Maximum number of skipped rows kept in the summary.
    pub failure_sample_limit: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100,
            row_error_policy: RowErrorPolicy::default(),
            document_id: DocumentIdStrategy::default(),
            failure_sample_limit: 20,
        }
    }
}

/// Lifecycle of a loader. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Opened,
    Streaming,
    Completed,
    Failed,
}

/// Loader that indexes complaint rows into the search backend.
///
/// A loader runs once. Starting another load on a loader that has
/// completed or failed is an error; build a new loader instead.
pub struct BulkLoader {
    service: Arc<SearchIndexService>,
    config: LoaderConfig,
    state: LoadState,
}

impl BulkLoader {
    /// Create a new loader on top of the given service.
    pub fn new(service: Arc<SearchIndexService>, config: LoaderConfig) -> Self {
        Self {
            service,
            config,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Open a CSV file, resolve its columns against the mapping and load it.
    ///
    /// Open and schema failures happen before any document is indexed.
    pub async fn load_file(
        &mut self,
        index: &str,
        path: impl AsRef<Path>,
        mapping: &FieldMapping,
        resolution: ColumnResolution,
    ) -> Result<LoadSummary, IngestError> {
        let (consumer, processor) = self.open_file(path, mapping, resolution)?;
        self.load(index, consumer, &processor).await
    }

    /// Open a CSV file and resolve its header against the mapping.
    ///
    /// On success the loader is `Opened`; an open or schema failure leaves
    /// it `Failed`.
    pub fn open_file(
        &mut self,
        path: impl AsRef<Path>,
        mapping: &FieldMapping,
        resolution: ColumnResolution,
    ) -> Result<(CsvConsumer, RecordProcessor), IngestError> {
        self.ensure_idle()?;

        let consumer = match CsvConsumer::open(path) {
            Ok(consumer) => consumer,
            Err(e) => return Err(self.fail(e)),
        };
        self.state = LoadState::Opened;

        let layout = match ColumnLayout::resolve(resolution, consumer.header(), mapping) {
            Ok(layout) => layout,
            Err(e) => return Err(self.fail(e)),
        };

        Ok((consumer, RecordProcessor::new(mapping.clone(), layout)))
    }

    /// Load every row of an opened consumer into the index.
    ///
    /// Accepts a loader that is `Idle` or was `Opened` by [`Self::open_file`].
    ///
    /// # Returns
    ///
    /// * `Ok(LoadSummary)` - Counts, skipped rows and the backend's final count
    /// * `Err(IngestError::InvalidState)` - If this loader already ran
    /// * `Err(IngestError)` - The fatal error that ended the load
    #[instrument(skip(self, consumer, processor))]
    pub async fn load(
        &mut self,
        index: &str,
        consumer: CsvConsumer,
        processor: &RecordProcessor,
    ) -> Result<LoadSummary, IngestError> {
        if self.state != LoadState::Opened {
            self.ensure_idle()?;
            self.state = LoadState::Opened;
        }

        let mut summary = LoadSummary::start(index, consumer.path());

        self.state = LoadState::Streaming;
        if let Err(e) = self.stream(index, consumer, processor, &mut summary).await {
            return Err(self.fail(e));
        }

        let backend_count = match self.service.count_documents(index).await {
            Ok(count) => count,
            Err(e) => return Err(self.fail(e.into())),
        };
        summary.finish(backend_count);
        self.state = LoadState::Completed;

        info!(
            run_id = %summary.run_id,
            rows_read = summary.rows_read,
            indexed = summary.documents_indexed,
            skipped = summary.rows_skipped,
            backend_count = backend_count,
            "Load completed"
        );

        if !summary.is_complete() {
            warn!(
                indexed = summary.documents_indexed,
                backend_count = backend_count,
                "Backend count differs from documents indexed"
            );
        }

        Ok(summary)
    }

    async fn stream(
        &self,
        index: &str,
        consumer: CsvConsumer,
        processor: &RecordProcessor,
        summary: &mut LoadSummary,
    ) -> Result<(), IngestError> {
        let started = Instant::now();
        let interval = self.config.progress_interval.max(1);

        for row in consumer.rows() {
            summary.rows_read += 1;

            let (line, result) = match row {
                Ok(row) => (
                    Some(row.line),
                    self.index_row(index, &row, processor, summary.documents_indexed)
                        .await,
                ),
                Err(e) => (e.line(), Err(e)),
            };

            match result {
                Ok(()) => {
                    summary.documents_indexed += 1;
                    if summary.documents_indexed % interval == 0 {
                        let elapsed = started.elapsed().as_secs_f64();
                        let rate = if elapsed > 0.0 {
                            summary.documents_indexed as f64 / elapsed
                        } else {
                            0.0
                        };
                        info!(
                            indexed = summary.documents_indexed,
                            skipped = summary.rows_skipped,
                            rows_per_sec = (rate * 10.0).round() / 10.0,
                            "Load progress"
                        );
                    }
                }
                Err(e) => self.handle_row_failure(line, e, summary)?,
            }
        }

        Ok(())
    }

    /// Transform, key and index one row.
    async fn index_row(
        &self,
        index: &str,
        row: &CsvRow,
        processor: &RecordProcessor,
        sequence: u64,
    ) -> Result<(), IngestError> {
        let document = processor.process(row)?;

        let id = match self.config.document_id {
            DocumentIdStrategy::Sequential => sequence.to_string(),
            DocumentIdStrategy::ComplaintNumber => match document.get(COMPLAINT_NUMBER_FIELD) {
                Some(key) if !key.trim().is_empty() => key.trim().to_string(),
                _ => return Err(IngestError::missing_key(row.line, COMPLAINT_NUMBER_FIELD)),
            },
        };

        self.service.index_document(index, &id, &document).await?;
        Ok(())
    }

    fn handle_row_failure(
        &self,
        line: Option<u64>,
        error: IngestError,
        summary: &mut LoadSummary,
    ) -> Result<(), IngestError> {
        if error.is_fatal() || self.config.row_error_policy == RowErrorPolicy::FailFast {
            error!(line = ?line, error = %error, "Row failed, aborting load");
            return Err(error);
        }

        warn!(line = ?line, error = %error, "Skipping row");
        summary.record_failure(line, error, self.config.failure_sample_limit);
        Ok(())
    }

    pub(crate) fn ensure_idle(&self) -> Result<(), IngestError> {
        match self.state {
            LoadState::Idle => Ok(()),
            state => Err(IngestError::InvalidState(format!(
                "loader is {:?}; a loader runs only once",
                state
            ))),
        }
    }

    fn fail(&mut self, error: IngestError) -> IngestError {
        self.state = LoadState::Failed;
        error
    }
}
