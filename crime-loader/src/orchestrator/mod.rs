//! Orchestrator module for the complaint loader.
//!
//! Runs one full load: drop the index, create it with the mapping, stream
//! the CSV into it and report the outcome.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoadSummary};
use crate::processor::ColumnResolution;
use crime_loader_repository::SearchIndexService;
use crime_loader_shared::FieldMapping;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Target index name.
    pub index: String,
    /// Input CSV file.
    pub csv_path: PathBuf,
    pub column_resolution: ColumnResolution,
}

/// Orchestrator that coordinates a load run.
///
/// The run is destructive: any existing index with the configured name is
/// deleted first, and there is no rollback if a later step fails.
pub struct Orchestrator {
    service: Arc<SearchIndexService>,
    loader: BulkLoader,
    mapping: FieldMapping,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        service: Arc<SearchIndexService>,
        loader: BulkLoader,
        mapping: FieldMapping,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            service,
            loader,
            mapping,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn loader(&self) -> &BulkLoader {
        &self.loader
    }

    /// Run the orchestrator.
    ///
    /// An orchestrator runs once; a second call fails before touching the
    /// index.
    ///
    /// 1. Delete the index; a missing index is accepted.
    /// 2. Create the index with the field mapping.
    /// 3. Load the CSV file.
    #[instrument(skip(self), fields(index = %self.config.index))]
    pub async fn run(&mut self) -> Result<LoadSummary, IngestError> {
        self.loader.ensure_idle()?;
        let index = self.config.index.as_str();

        info!(
            source = %self.config.csv_path.display(),
            fields = self.mapping.len(),
            resolution = ?self.config.column_resolution,
            "Starting complaint load"
        );

        if self.service.delete_index_if_exists(index).await? {
            info!("Deleted existing index");
        }

        self.service.create_index(index, &self.mapping).await?;
        info!("Created index");

        let summary = self
            .loader
            .load_file(
                index,
                &self.config.csv_path,
                &self.mapping,
                self.config.column_resolution,
            )
            .await?;

        if summary.rows_skipped > 0 {
            warn!(
                skipped = summary.rows_skipped,
                sampled = summary.failures.len(),
                "Some rows were skipped"
            );
            for failure in &summary.failures {
                warn!(line = ?failure.line, error = %failure.error, "Skipped row");
            }
        }

        info!(
            run_id = %summary.run_id,
            indexed = summary.documents_indexed,
            backend_count = summary.backend_count,
            duration_ms = summary.duration_ms().unwrap_or_default(),
            "Data indexed successfully, analysis can continue in Kibana"
        );

        Ok(summary)
    }
}
