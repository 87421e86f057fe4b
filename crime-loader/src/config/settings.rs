//! Loader settings read from the YAML configuration file.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::loader::{DocumentIdStrategy, LoaderConfig, RowErrorPolicy};
use crate::orchestrator::OrchestratorConfig;
use crate::processor::ColumnResolution;
use crate::IndexingError;
use crime_loader_repository::{validate_index_name, ConnectionConfig};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CRIME_LOADER_CONFIG";

/// Configuration file used when `CRIME_LOADER_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Dataset file used when the configuration does not name one.
pub const DEFAULT_CSV_PATH: &str = "NYPD_Complaint_Data_Current__Year_To_Date__20240421.csv";

/// Connection settings for the search backend.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElasticConfig {
    /// Scheme and host, e.g. `https://localhost`.
    pub host: String,
    pub port: u16,
    /// PEM file with the CA certificate that signed the backend's certificate.
    pub ca_certs: PathBuf,
    pub user: String,
    pub password: String,
    /// Name of the index to (re)create and load.
    pub index: String,
}

impl ElasticConfig {
    /// The backend URL, `{host}:{port}`.
    pub fn node_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }

    /// Connection settings for the repository layer.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.node_url())
            .with_credentials(self.user.clone(), self.password.clone())
            .with_ca_cert(self.ca_certs.clone())
    }
}

impl fmt::Debug for ElasticConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ca_certs", &self.ca_certs)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("index", &self.index)
            .finish()
    }
}

/// Optional `loader` section; every key has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    pub csv_path: PathBuf,
    pub progress_interval: u64,
    pub row_error_policy: RowErrorPolicy,
    pub document_id: DocumentIdStrategy,
    pub column_resolution: ColumnResolution,
    pub failure_sample_limit: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        let loader = LoaderConfig::default();
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            progress_interval: loader.progress_interval,
            row_error_policy: loader.row_error_policy,
            document_id: loader.document_id,
            column_resolution: ColumnResolution::default(),
            failure_sample_limit: loader.failure_sample_limit,
        }
    }
}

/// Complete settings for one loader run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderSettings {
    pub elastic: ElasticConfig,
    #[serde(default)]
    pub loader: LoadOptions,
}

impl LoaderSettings {
    /// Load settings from the file named by `CRIME_LOADER_CONFIG`, or from
    /// `config.yaml` in the working directory.
    pub fn from_env() -> Result<Self, IndexingError> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }

    /// Load and validate settings from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(LoaderSettings)` - Parsed and validated settings
    /// * `Err(IndexingError::ConfigError)` - If the file is missing, malformed or invalid
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IndexingError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            IndexingError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&content)
            .map_err(|e| IndexingError::config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate settings from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, IndexingError> {
        let settings: Self = serde_yaml::from_str(content)
            .map_err(|e| IndexingError::config(format!("Invalid configuration: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), IndexingError> {
        if self.elastic.host.trim().is_empty() {
            return Err(IndexingError::config("elastic.host must not be empty"));
        }
        if self.elastic.port == 0 {
            return Err(IndexingError::config("elastic.port must not be 0"));
        }
        validate_index_name(&self.elastic.index)
            .map_err(|e| IndexingError::config(format!("elastic.index: {}", e)))?;

        let url = self.elastic.node_url();
        Url::parse(&url).map_err(|e| {
            IndexingError::config(format!("elastic.host and port form an invalid URL '{}': {}", url, e))
        })?;

        if self.loader.progress_interval == 0 {
            return Err(IndexingError::config("loader.progress_interval must be positive"));
        }

        Ok(())
    }

    /// Bulk loader configuration.
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            progress_interval: self.loader.progress_interval,
            row_error_policy: self.loader.row_error_policy,
            document_id: self.loader.document_id,
            failure_sample_limit: self.loader.failure_sample_limit,
        }
    }

    /// Orchestrator configuration.
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            index: self.elastic.index.clone(),
            csv_path: self.loader.csv_path.clone(),
            column_resolution: self.loader.column_resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
elastic:
  host: https://localhost
  port: 9200
  ca_certs: http_ca.crt
  user: elastic
  password: s3cret
  index: nypd
"#;

    #[test]
    fn test_minimal_config_uses_loader_defaults() {
        let settings = LoaderSettings::from_yaml_str(MINIMAL).unwrap();

        assert_eq!(settings.elastic.node_url(), "https://localhost:9200");
        assert_eq!(settings.loader, LoadOptions::default());
        assert_eq!(settings.loader.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
        assert_eq!(settings.loader.progress_interval, 100);
        assert_eq!(settings.loader.row_error_policy, RowErrorPolicy::Skip);
        assert_eq!(
            settings.loader.document_id,
            DocumentIdStrategy::ComplaintNumber
        );
        assert_eq!(settings.loader.column_resolution, ColumnResolution::Header);
    }

    #[test]
    fn test_loader_section_overrides() {
        let yaml = format!(
            "{}loader:\n  csv_path: data/small.csv\n  progress_interval: 5\n  row_error_policy: fail_fast\n  document_id: sequential\n  column_resolution: positional\n",
            MINIMAL
        );

        let settings = LoaderSettings::from_yaml_str(&yaml).unwrap();
        let loader = settings.loader_config();
        let orchestrator = settings.orchestrator_config();

        assert_eq!(loader.progress_interval, 5);
        assert_eq!(loader.row_error_policy, RowErrorPolicy::FailFast);
        assert_eq!(loader.document_id, DocumentIdStrategy::Sequential);
        assert_eq!(loader.failure_sample_limit, 20);
        assert_eq!(orchestrator.index, "nypd");
        assert_eq!(orchestrator.csv_path, PathBuf::from("data/small.csv"));
        assert_eq!(orchestrator.column_resolution, ColumnResolution::Positional);
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = MINIMAL.replace("  password: s3cret\n", "");

        let err = LoaderSettings::from_yaml_str(&yaml).unwrap_err();

        assert!(matches!(err, IndexingError::ConfigError(ref msg) if msg.contains("password")));
    }

    #[test]
    fn test_invalid_values() {
        for (from, to) in [
            ("port: 9200", "port: 0"),
            ("index: nypd", "index: NYPD"),
            ("index: nypd", "index: \"\""),
            ("host: https://localhost", "host: \"\""),
        ] {
            let yaml = MINIMAL.replace(from, to);
            assert!(
                matches!(
                    LoaderSettings::from_yaml_str(&yaml),
                    Err(IndexingError::ConfigError(_))
                ),
                "{} should be rejected",
                to
            );
        }

        let yaml = format!("{}loader:\n  progress_interval: 0\n", MINIMAL);
        assert!(LoaderSettings::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let yaml = format!("{}loader:\n  row_error_policy: retry\n", MINIMAL);

        assert!(LoaderSettings::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        file.flush().unwrap();

        let settings = LoaderSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.elastic.index, "nypd");

        let err = LoaderSettings::from_file("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, IndexingError::ConfigError(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = LoaderSettings::from_yaml_str(MINIMAL).unwrap();

        let debug = format!("{:?}", settings);

        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_connection_config() {
        let settings = LoaderSettings::from_yaml_str(MINIMAL).unwrap();

        let conn = settings.elastic.connection_config();

        assert_eq!(conn.url, "https://localhost:9200");
        assert_eq!(conn.username.as_deref(), Some("elastic"));
        assert_eq!(conn.password.as_deref(), Some("s3cret"));
        assert_eq!(conn.ca_cert_path, Some(PathBuf::from("http_ca.crt")));
    }
}
