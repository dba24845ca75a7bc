//! Postgres-backed product collection.
//!
//! Each collection is a table of JSONB documents keyed by a UUID that the
//! database generates on insert:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS <collection> (
//!     id  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     doc JSONB NOT NULL
//! )
//! ```
//!
//! ## Error Mapping
//!
//! | Failure | StoreError |
//! |---------|------------|
//! | identifier is not a UUID | `InvalidKey` |
//! | pool could not be established | `Connection` |
//! | any sqlx error during a query | `Database` |
//! | stored `doc` does not decode as a product | `Corrupt` |

use std::sync::Arc;

use sqlx::types::Json;
use sqlx::Row;
use tokio::sync::OnceCell;
use tracing::instrument;
use uuid::Uuid;

use stocktake_core::DocumentId;
use stocktake_products::{NewProduct, Product, StockUpdate};

use super::{ProductStore, StoreError, native_key};
use crate::collection::CollectionName;
use crate::connector::PgConnector;

/// Product collection stored as JSONB documents in Postgres.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    connector: Arc<PgConnector>,
    collection: CollectionName,
    ready: Arc<OnceCell<()>>,
}

impl PostgresProductStore {
    pub fn new(connector: Arc<PgConnector>, collection: CollectionName) -> Self {
        Self {
            connector,
            collection,
            ready: Arc::new(OnceCell::new()),
        }
    }

    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Pool for this collection, creating the backing table on first use.
    async fn pool(&self) -> Result<&sqlx::PgPool, StoreError> {
        let pool = self.connector.pool().await?;
        self.ready
            .get_or_try_init(|| async {
                let ddl = format!(
                    "CREATE TABLE IF NOT EXISTS {} (\
                        id UUID PRIMARY KEY DEFAULT gen_random_uuid(), \
                        doc JSONB NOT NULL\
                    )",
                    self.collection
                );
                sqlx::query(&ddl)
                    .execute(pool)
                    .await
                    .map(|_| ())
                    .map_err(|e| map_sqlx_error("ensure_collection", e))
            })
            .await?;
        Ok(pool)
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), fields(collection = %self.collection), err)]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("SELECT id, doc FROM {}", self.collection);

        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| map_sqlx_error("list", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let key: Uuid = row
                .try_get("id")
                .map_err(|e| map_sqlx_error("list", e))?;
            let doc: Json<NewProduct> = row.try_get("doc").map_err(|e| StoreError::Corrupt {
                id: key.to_string(),
                message: e.to_string(),
            })?;
            products.push(Product::from_new(document_id(key)?, doc.0));
        }

        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }

    #[instrument(skip(self, product), fields(collection = %self.collection), err)]
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let pool = self.pool().await?;
        let sql = format!("INSERT INTO {} (doc) VALUES ($1) RETURNING id", self.collection);

        let key: Uuid = sqlx::query_scalar(&sql)
            .bind(Json(&product))
            .fetch_one(pool)
            .await
            .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(Product::from_new(document_id(key)?, product))
    }

    #[instrument(skip(self), fields(collection = %self.collection), err)]
    async fn update_stock(&self, id: &DocumentId, update: StockUpdate) -> Result<bool, StoreError> {
        let key = native_key(id)?;
        let pool = self.pool().await?;
        let sql = format!(
            "UPDATE {} SET doc = doc || jsonb_build_object('quantity', $2::bigint, 'price', $3::float8) \
             WHERE id = $1",
            self.collection
        );

        let result = sqlx::query(&sql)
            .bind(key)
            .bind(update.quantity)
            .bind(update.price)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("update_stock", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(collection = %self.collection), err)]
    async fn delete(&self, id: &DocumentId) -> Result<bool, StoreError> {
        let key = native_key(id)?;
        let pool = self.pool().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1", self.collection);

        let result = sqlx::query(&sql)
            .bind(key)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn document_id(key: Uuid) -> Result<DocumentId, StoreError> {
    key.to_string()
        .parse()
        .map_err(|_| StoreError::InvalidKey(key.to_string()))
}

/// Map SQLx errors to store errors.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    let message = match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("{} (code {})", db_err.message(), code),
            None => db_err.message().to_string(),
        },
        sqlx::Error::PoolClosed => "connection pool closed".to_string(),
        sqlx::Error::PoolTimedOut => "timed out acquiring a connection".to_string(),
        other => other.to_string(),
    };
    StoreError::Database { operation, message }
}
