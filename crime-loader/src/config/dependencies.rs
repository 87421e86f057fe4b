//! Dependency initialization and wiring for the complaint loader.

use std::sync::Arc;
use tracing::info;

use crate::config::LoaderSettings;
use crate::loader::BulkLoader;
use crate::orchestrator::Orchestrator;
use crate::IndexingError;
use crime_loader_repository::{OpenSearchProvider, SearchIndexProvider, SearchIndexService};
use crime_loader_shared::FieldMapping;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Connect to the search backend and wire the load pipeline.
    ///
    /// The backend is contacted once to fetch cluster information; there is
    /// no retry, so an unreachable backend fails here before any index is
    /// touched.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the client cannot be built or the backend is unreachable
    pub async fn new(settings: &LoaderSettings) -> Result<Self, IndexingError> {
        info!(
            node_url = %settings.elastic.node_url(),
            user = %settings.elastic.user,
            index = %settings.elastic.index,
            source = %settings.loader.csv_path.display(),
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(&settings.elastic.connection_config()).await?;

        let cluster = provider.info().await?;
        info!(
            cluster_name = %cluster.cluster_name,
            distribution = %cluster.distribution,
            version = %cluster.version,
            "Connected to search backend"
        );

        Ok(Self::with_provider(settings, Box::new(provider)))
    }

    /// Wire the load pipeline on top of an existing provider.
    pub fn with_provider(settings: &LoaderSettings, provider: Box<dyn SearchIndexProvider>) -> Self {
        let service = Arc::new(SearchIndexService::new(provider));
        let loader = BulkLoader::new(service.clone(), settings.loader_config());
        let orchestrator = Orchestrator::new(
            service,
            loader,
            FieldMapping::nypd_complaints(),
            settings.orchestrator_config(),
        );

        Self { orchestrator }
    }
}
