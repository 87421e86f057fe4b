//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch (or a compatible Elasticsearch cluster) as the backend.

mod index_config;
mod provider;

pub use index_config::{get_index_settings, get_mapping_properties, IndexConfig};
pub use provider::OpenSearchProvider;
