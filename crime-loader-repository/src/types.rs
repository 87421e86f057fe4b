//! Response types for search backend operations.

use serde_json::Value;

use crate::errors::SearchIndexError;

/// Cluster identity reported by the backend's root endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    /// Name of the cluster.
    pub cluster_name: String,
    /// Distribution name (`opensearch` or `elasticsearch`).
    pub distribution: String,
    /// Server version number.
    pub version: String,
}

impl ClusterInfo {
    /// Parse the body of `GET /`.
    ///
    /// Elasticsearch omits `version.distribution`; it is reported as
    /// `elasticsearch` in that case.
    pub fn from_response(body: &Value) -> Result<Self, SearchIndexError> {
        let cluster_name = body
            .get("cluster_name")
            .and_then(Value::as_str)
            .ok_or_else(|| SearchIndexError::parse("Missing cluster_name in info response"))?;

        let version = body
            .get("version")
            .and_then(|v| v.get("number"))
            .and_then(Value::as_str)
            .ok_or_else(|| SearchIndexError::parse("Missing version.number in info response"))?;

        let distribution = body
            .get("version")
            .and_then(|v| v.get("distribution"))
            .and_then(Value::as_str)
            .unwrap_or("elasticsearch");

        Ok(Self {
            cluster_name: cluster_name.to_string(),
            distribution: distribution.to_string(),
            version: version.to_string(),
        })
    }
}
