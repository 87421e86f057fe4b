//! # Crime Loader
//!
//! Loads the NYPD complaint dataset from a CSV file into an
//! Elasticsearch/OpenSearch index for later analysis in Kibana.
//!
//! ## Architecture
//!
//! The loader follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Reads CSV rows lazily from the input file
//! 2. **Processor**: Transforms rows into complaint documents
//! 3. **Loader**: Indexes documents one by one, in file order
//! 4. **Orchestrator**: Recreates the index and drives one load run
//!
//! ## Modules
//!
//! - [`config`]: Settings file loading and dependency wiring
//! - [`consumer`]: CSV row source
//! - [`processor`]: Column resolution and row transformation
//! - [`loader`]: Indexing, row error policy and run summary
//! - [`orchestrator`]: Delete, create, load
//! - [`errors`]: Error types for the load pipeline

pub mod config;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use config::{Dependencies, LoaderSettings};
pub use errors::IngestError;
pub use loader::LoadSummary;

use crime_loader_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur during loader initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),

    /// Search backend error outside a load run.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
