//! Search index service implementation.
//!
//! This module provides the service application code uses to manage the
//! complaint index and write documents into it. It validates inputs and
//! delegates to a `SearchIndexProvider`.

use crime_loader_shared::{ComplaintDocument, FieldMapping};
use tracing::{info, warn};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::utils::validate_index_name;

/// Longest document id the backend accepts, in bytes.
const MAX_DOCUMENT_ID_BYTES: usize = 512;

/// The main service for interacting with the search index.
///
/// This is the high-level API the loader uses. It owns the backend handle
/// and is passed explicitly to every component that needs it.
///
/// # Example
///
/// ```no_run
/// use crime_loader_repository::{ConnectionConfig, OpenSearchProvider, SearchIndexService};
/// use crime_loader_shared::FieldMapping;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConnectionConfig::new("http://localhost:9200");
/// let provider = Box::new(OpenSearchProvider::new(&config).await?);
/// let service = SearchIndexService::new(provider);
///
/// service.recreate_index("nypd", &FieldMapping::nypd_complaints()).await?;
/// # Ok(())
/// # }
/// ```
pub struct SearchIndexService {
    provider: Box<dyn SearchIndexProvider>,
}

impl SearchIndexService {
    /// Create a new SearchIndexService.
    ///
    /// # Arguments
    ///
    /// * `provider` - A boxed implementation of `SearchIndexProvider` (e.g., `OpenSearchProvider`)
    pub fn new(provider: Box<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Validate a document id.
    fn validate_document_id(id: &str) -> Result<(), SearchIndexError> {
        if id.is_empty() {
            return Err(SearchIndexError::validation("Document id is required"));
        }
        if id.len() > MAX_DOCUMENT_ID_BYTES {
            return Err(SearchIndexError::validation(format!(
                "Document id is {} bytes, maximum is {}",
                id.len(),
                MAX_DOCUMENT_ID_BYTES
            )));
        }
        Ok(())
    }

    /// Create the index with the given field mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError::ValidationError)` - If the index name is invalid
    /// * `Err(SearchIndexError::IndexAlreadyExists)` - If the index exists; delete it first
    pub async fn create_index(
        &self,
        index: &str,
        mapping: &FieldMapping,
    ) -> Result<(), SearchIndexError> {
        validate_index_name(index)?;
        self.provider.create_index(index, mapping).await
    }

    /// Delete the index.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted
    /// * `Err(SearchIndexError::IndexNotFound)` - If the index does not exist
    pub async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        validate_index_name(index)?;
        self.provider.delete_index(index).await
    }

    /// Delete the index, accepting that it may not exist.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index existed and was deleted
    /// * `Ok(false)` - If there was no index to delete
    /// * `Err(SearchIndexError)` - If deletion failed for another reason
    pub async fn delete_index_if_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        match self.delete_index(index).await {
            Ok(()) => Ok(true),
            Err(SearchIndexError::IndexNotFound(_)) => {
                warn!(index = %index, "Index did not exist, nothing to delete");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop any existing index and create it fresh with the given mapping.
    ///
    /// Destructive: all documents in the existing index are lost. There is no
    /// rollback if creation fails after the delete succeeded.
    pub async fn recreate_index(
        &self,
        index: &str,
        mapping: &FieldMapping,
    ) -> Result<(), SearchIndexError> {
        let deleted = self.delete_index_if_exists(index).await?;
        self.create_index(index, mapping).await?;
        info!(index = %index, replaced_existing = deleted, "Index recreated");
        Ok(())
    }

    /// Index one document under the given id.
    pub async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &ComplaintDocument,
    ) -> Result<(), SearchIndexError> {
        Self::validate_document_id(id)?;
        self.provider.index_document(index, id, document).await
    }

    /// Return the backend's authoritative document count for the index.
    pub async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError> {
        validate_index_name(index)?;
        self.provider.count_documents(index).await
    }
}
