//! Connection settings for the OpenSearch provider.

use std::fmt;
use std::path::PathBuf;

/// How to reach and authenticate against the search backend.
///
/// The password is kept out of `Debug` output so the config can be logged.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Node URL including scheme and port (e.g. `https://localhost:9200`).
    pub url: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password (required if username is set).
    pub password: Option<String>,
    /// PEM file with the CA certificate used to validate the node.
    pub ca_cert_path: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a config for an unauthenticated node.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            ca_cert_path: None,
        }
    }

    /// Set basic auth credentials.
    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }

    /// Validate the node certificate against the CA in this PEM file.
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_path = Some(path.into());
        self
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ca_cert_path", &self.ca_cert_path)
            .finish()
    }
}
