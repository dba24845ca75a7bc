//! Product collection abstraction and its implementations.

use std::sync::Arc;

use stocktake_core::DocumentId;
use stocktake_products::{NewProduct, Product, StockUpdate};
use thiserror::Error;

use crate::connector::ConnectorError;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;

/// Store-level failures.
///
/// Anything here is unexpected from the caller's point of view; lookup misses
/// are reported through return values, not errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier could not be converted to the store's native key type.
    #[error("invalid document key '{0}'")]
    InvalidKey(String),

    #[error(transparent)]
    Connection(#[from] ConnectorError),

    #[error("database error in {operation}: {message}")]
    Database { operation: &'static str, message: String },

    #[error("corrupt document {id}: {message}")]
    Corrupt { id: String, message: String },

    #[error("store lock poisoned")]
    Poisoned,
}

/// A collection of product documents.
///
/// Every operation is a single-document atomic action in the underlying store;
/// there is no cross-call locking or versioning, so concurrent updates to the
/// same document resolve as last-write-wins.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// All documents in store-native order (no ordering guarantee across calls).
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Insert a new document; the store assigns its identifier.
    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// Set `quantity`/`price` on the matching document.
    ///
    /// Returns `false` when no document matched `id`.
    async fn update_stock(&self, id: &DocumentId, update: StockUpdate) -> Result<bool, StoreError>;

    /// Remove at most one matching document.
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &DocumentId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        (**self).insert(product).await
    }

    async fn update_stock(&self, id: &DocumentId, update: StockUpdate) -> Result<bool, StoreError> {
        (**self).update_stock(id, update).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}

/// Convert an opaque identifier to the native UUID key.
pub(crate) fn native_key(id: &DocumentId) -> Result<uuid::Uuid, StoreError> {
    uuid::Uuid::parse_str(id.as_str()).map_err(|_| StoreError::InvalidKey(id.to_string()))
}
