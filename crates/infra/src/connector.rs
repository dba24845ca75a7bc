//! Lazily-established, process-lifetime connection to the document database.
//!
//! The connector is an explicit handle: build one at startup, share it behind
//! an `Arc`, and hand it to every collection that needs the database. The
//! first caller to need a connection opens the pool; everyone after that gets
//! the same pool. A failed connect is returned to the caller as-is and the
//! next call tries again (there is no retry loop here).

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::collection::CollectionName;
use crate::store::PostgresProductStore;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
}

/// Handle to the Postgres database holding product documents.
#[derive(Debug)]
pub struct PgConnector {
    database_url: String,
    max_connections: u32,
    acquire_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl PgConnector {
    pub fn new(database_url: impl Into<String>, max_connections: u32) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: max_connections.max(1),
            acquire_timeout: Duration::from_secs(10),
            pool: OnceCell::new(),
        }
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Wrap an already-open pool (tests, embedding).
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            database_url: String::new(),
            max_connections: pool.options().get_max_connections(),
            acquire_timeout: pool.options().get_acquire_timeout(),
            pool: OnceCell::new_with(Some(pool)),
        }
    }

    /// Whether a pool has been established yet.
    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    /// Live pool, connecting on first use and reusing it afterwards.
    pub async fn pool(&self) -> Result<&PgPool, ConnectorError> {
        self.pool
            .get_or_try_init(|| async {
                tracing::info!(
                    max_connections = self.max_connections,
                    "connecting to document store"
                );
                PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .acquire_timeout(self.acquire_timeout)
                    .connect(&self.database_url)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "document store connection failed");
                        ConnectorError::Connect(e)
                    })
            })
            .await
    }

    /// Handle to a named collection backed by this connection.
    pub fn collection(self: &Arc<Self>, name: CollectionName) -> PostgresProductStore {
        PostgresProductStore::new(self.clone(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_failure_propagates_and_leaves_handle_unconnected() {
        // Nothing listens on port 1; the connect attempt fails fast.
        let connector = PgConnector::new("postgres://stocktake@127.0.0.1:1/stocktake", 1)
            .with_acquire_timeout(Duration::from_secs(1));
        let err = connector.pool().await.unwrap_err();
        assert!(matches!(err, ConnectorError::Connect(_)));
        assert!(!connector.is_connected());
    }

    #[tokio::test]
    async fn established_pool_is_reused() {
        // connect_lazy opens no connection until a query runs.
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_lazy("postgres://stocktake@127.0.0.1:1/stocktake")
            .unwrap();
        let connector = Arc::new(PgConnector::from_pool(pool));
        assert!(connector.is_connected());
        assert_eq!(connector.max_connections, 2);

        let first = connector.pool().await.unwrap();
        let second = connector.pool().await.unwrap();
        assert!(std::ptr::eq(first, second));

        let (a, b) = tokio::join!(connector.pool(), connector.pool());
        assert!(std::ptr::eq(a.unwrap(), b.unwrap()));
        assert!(std::ptr::eq(first, connector.pool().await.unwrap()));
    }

    #[test]
    fn pool_size_is_at_least_one() {
        let connector = PgConnector::new("postgres://localhost/stocktake", 0);
        assert_eq!(connector.max_connections, 1);
    }
}
