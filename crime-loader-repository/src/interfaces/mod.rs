//! Interface definitions for the search index provider.
//!
//! This module defines the abstract `SearchIndexProvider` trait so that the
//! loader can run against OpenSearch in production and an in-memory double
//! in tests.

mod search_index_provider;

pub use search_index_provider::SearchIndexProvider;
