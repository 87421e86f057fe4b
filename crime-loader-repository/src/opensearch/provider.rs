//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate. It also speaks to Elasticsearch clusters,
//! which share the index, document and count APIs used here.

use std::fs;

use async_trait::async_trait;
use crime_loader_shared::{ComplaintDocument, FieldMapping};
use opensearch::{
    auth::Credentials,
    cert::{Certificate, CertificateValidation},
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesRefreshParts},
    CountParts, IndexParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::types::ClusterInfo;

/// Error type the backend reports when creating an index that exists.
const ALREADY_EXISTS_ERROR_TYPE: &str = "resource_already_exists_exception";

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use crime_loader_repository::{ConnectionConfig, OpenSearchProvider};
///
/// let config = ConnectionConfig::new("https://localhost:9200")
///     .with_credentials("elastic".to_string(), "changeme".to_string())
///     .with_ca_cert("http_ca.crt");
/// let provider = OpenSearchProvider::new(&config).await?;
/// provider.info().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider with default index settings.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL, credentials or CA certificate are unusable
    pub async fn new(config: &ConnectionConfig) -> Result<Self, SearchIndexError> {
        Self::with_index_config(config, IndexConfig::default()).await
    }

    /// Create a new OpenSearch provider with a custom shard layout.
    pub async fn with_index_config(
        config: &ConnectionConfig,
        index_config: IndexConfig,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url = Url::parse(&config.url).map_err(|e| {
            SearchIndexError::validation(format!("Invalid node URL '{}': {}", config.url, e))
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if let Some(ref username) = config.username {
            let password = config.password.clone().unwrap_or_default();
            builder = builder.auth(Credentials::Basic(username.clone(), password));
        }

        if let Some(ref ca_cert_path) = config.ca_cert_path {
            let pem = fs::read(ca_cert_path).map_err(|e| {
                SearchIndexError::validation(format!(
                    "Failed to read CA certificate {}: {}",
                    ca_cert_path.display(),
                    e
                ))
            })?;
            let certificate = Certificate::from_pem(&pem).map_err(|e| {
                SearchIndexError::validation(format!(
                    "Invalid CA certificate {}: {}",
                    ca_cert_path.display(),
                    e
                ))
            })?;
            builder = builder.cert_validation(CertificateValidation::Full(certificate));
        }

        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %config.url,
            authenticated = config.username.is_some(),
            ca_cert = config.ca_cert_path.is_some(),
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Fetch the cluster's name and version.
    ///
    /// Used once at startup to confirm the backend is reachable before the
    /// index is touched.
    pub async fn info(&self) -> Result<ClusterInfo, SearchIndexError> {
        let response = self
            .client
            .info()
            .send()
            .await
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::backend_unavailable(format!(
                "Info request failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        ClusterInfo::from_response(&body)
    }

    /// Read a failed response into `(status, body)`.
    async fn failure(response: Response) -> (StatusCode, String) {
        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        (status, body)
    }

    /// Server errors and throttling: the backend cannot serve requests at all.
    fn is_unavailable_status(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    fn unavailable(operation: &str, status: StatusCode, body: &str) -> SearchIndexError {
        SearchIndexError::backend_unavailable(format!(
            "{} failed with status {}: {}",
            operation, status, body
        ))
    }

    /// Classify a failed index creation.
    fn create_failure(index: &str, status: StatusCode, body: &str) -> SearchIndexError {
        if Self::is_unavailable_status(status) {
            return Self::unavailable(&format!("Create index '{}'", index), status, body);
        }
        if status.as_u16() == 400 && Self::error_type(body).as_deref() == Some(ALREADY_EXISTS_ERROR_TYPE)
        {
            return SearchIndexError::index_already_exists(index);
        }
        SearchIndexError::index_creation(format!(
            "Create index '{}' failed with status {}: {}",
            index, status, body
        ))
    }

    /// Classify a failed index deletion.
    fn delete_failure(index: &str, status: StatusCode, body: &str) -> SearchIndexError {
        if Self::is_unavailable_status(status) {
            return Self::unavailable(&format!("Delete index '{}'", index), status, body);
        }
        if status.as_u16() == 404 {
            return SearchIndexError::index_not_found(index);
        }
        SearchIndexError::index_deletion(format!(
            "Delete index '{}' failed with status {}: {}",
            index, status, body
        ))
    }

    /// Classify a failed document write. Client errors are rejections of
    /// this one document; anything else means the backend is unusable.
    fn index_failure(id: &str, status: StatusCode, body: &str) -> SearchIndexError {
        if Self::is_unavailable_status(status) {
            return Self::unavailable(&format!("Index document '{}'", id), status, body);
        }
        SearchIndexError::index(format!(
            "Index document '{}' failed with status {}: {}",
            id, status, body
        ))
    }

    /// Classify a failed refresh or count.
    fn count_failure(index: &str, status: StatusCode, body: &str) -> SearchIndexError {
        if Self::is_unavailable_status(status) {
            return Self::unavailable(&format!("Count on '{}'", index), status, body);
        }
        if status.as_u16() == 404 {
            return SearchIndexError::index_not_found(index);
        }
        SearchIndexError::count(format!(
            "Count on '{}' failed with status {}: {}",
            index, status, body
        ))
    }

    /// Extract `error.type` from a backend error body.
    fn error_type(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        value
            .get("error")
            .and_then(|e| e.get("type"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Extract `count` from a `_count` response body.
    fn parse_count(body: &Value) -> Result<u64, SearchIndexError> {
        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| SearchIndexError::parse(format!("Missing count in response: {}", body)))
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn create_index(
        &self,
        index: &str,
        mapping: &FieldMapping,
    ) -> Result<(), SearchIndexError> {
        let body = get_index_settings(mapping, &self.index_config);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::failure(response).await;
            let err = Self::create_failure(index, status, &error_body);
            error!(index = %index, status = %status, error = %err, "Create index request failed");
            return Err(err);
        }

        info!(index = %index, fields = mapping.len(), "Index created");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::failure(response).await;
            return Err(Self::delete_failure(index, status, &error_body));
        }

        info!(index = %index, "Index deleted");
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &ComplaintDocument,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::failure(response).await;
            error!(status = %status, doc_id = %id, body = %error_body, "Index request failed");
            return Err(Self::index_failure(id, status, &error_body));
        }

        debug!(doc_id = %id, "Document indexed");
        Ok(())
    }

    async fn count_documents(&self, index: &str) -> Result<u64, SearchIndexError> {
        // Make every acknowledged write visible before counting.
        let refresh = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        if !refresh.status_code().is_success() {
            let (status, error_body) = Self::failure(refresh).await;
            return Err(Self::count_failure(index, status, &error_body));
        }

        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::backend_unavailable(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::failure(response).await;
            return Err(Self::count_failure(index, status, &error_body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let count = Self::parse_count(&body)?;
        debug!(index = %index, count = count, "Counted documents");
        Ok(count)
    }
}
