//! Store wiring for the HTTP layer.

use std::sync::Arc;

use stocktake_infra::{InMemoryProductStore, PgConnector, ProductStore};

use crate::config::{ApiConfig, StoreBackend};

/// Shared handles used by every request.
#[derive(Clone)]
pub struct AppServices {
    products: Arc<dyn ProductStore>,
    backend: &'static str,
}

impl AppServices {
    pub fn new(products: Arc<dyn ProductStore>, backend: &'static str) -> Self {
        Self { products, backend }
    }

    /// Dev/test wiring backed by an in-memory collection.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), "in_memory")
    }

    pub fn products(&self) -> &dyn ProductStore {
        self.products.as_ref()
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

/// Build services from configuration.
///
/// The Postgres connector connects lazily on the first request, so startup
/// never blocks on (or fails because of) the database.
pub fn build_services(config: &ApiConfig) -> AppServices {
    match &config.store {
        StoreBackend::InMemory => {
            tracing::info!(collection = %config.collection, "using in-memory product store");
            AppServices::in_memory()
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            tracing::info!(
                collection = %config.collection,
                max_connections,
                "using postgres product store"
            );
            let connector = Arc::new(PgConnector::new(database_url.clone(), *max_connections));
            let store = connector.collection(config.collection.clone());
            AppServices::new(Arc::new(store), "postgres")
        }
    }
}
