//! # Crime Loader Repository
//!
//! This crate provides the backend seam for the complaint loader: the
//! `SearchIndexProvider` trait covering the four operations the loader needs
//! (index create, index delete, document index, document count), an
//! OpenSearch implementation of it, and the `SearchIndexService` that
//! application code talks to.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod types;
pub mod utils;

pub use config::ConnectionConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use service::SearchIndexService;
pub use types::ClusterInfo;
pub use utils::validate_index_name;
