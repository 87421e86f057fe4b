//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch,
//! or any document store exposing the same four operations).

use async_trait::async_trait;
use crime_loader_shared::{ComplaintDocument, FieldMapping};

use crate::errors::SearchIndexError;

/// Abstracts the underlying document store.
///
/// These four operations are the entire backend surface the loader depends
/// on. Implementations are injected into `SearchIndexService`, which lets the
/// loader run against a mock in tests.
///
/// Index creation and deletion are a strict two-step protocol, not an
/// idempotent upsert: creating an existing index fails with
/// `IndexAlreadyExists` and deleting a missing one fails with `IndexNotFound`.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Create an index with the given field mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError::IndexAlreadyExists)` - If an index with this name exists
    /// * `Err(SearchIndexError)` - If creation fails for another reason
    async fn create_index(&self, index: &str, mapping: &FieldMapping)
        -> Result<(), SearchIndexError>;

    /// Delete an index and all of its documents.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted
    /// * `Err(SearchIndexError::IndexNotFound)` - If the index does not exist
    /// * `Err(SearchIndexError)` - If deletion fails for another reason
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Index a document under the given id, replacing any document already
    /// stored under that id.
    ///
    /// The call returns only after the backend has acknowledged the write.
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &ComplaintDocument,
    ) -> Result<(), SearchIndexError>;

    /// Return the backend's authoritative document count for the index.
    ///
    /// Implementations must make writes acknowledged before this call visible
    /// to the count.
    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError>;
}
