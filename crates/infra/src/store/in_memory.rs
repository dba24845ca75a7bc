use std::sync::RwLock;

use stocktake_core::DocumentId;
use stocktake_products::{NewProduct, Product, StockUpdate};
use uuid::Uuid;

use super::{ProductStore, StoreError, native_key};

/// In-memory product collection.
///
/// Intended for tests/dev. Keys are UUIDv7, and insertion order is the
/// store-native listing order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    documents: RwLock<Vec<(Uuid, Product)>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let documents = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let documents = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        Ok(documents.iter().map(|(_, p)| p.clone()).collect())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let key = Uuid::now_v7();
        let id: DocumentId = key
            .to_string()
            .parse()
            .map_err(|_| StoreError::InvalidKey(key.to_string()))?;
        let stored = Product::from_new(id, product);

        let mut documents = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        documents.push((key, stored.clone()));
        Ok(stored)
    }

    async fn update_stock(&self, id: &DocumentId, update: StockUpdate) -> Result<bool, StoreError> {
        let key = native_key(id)?;
        let mut documents = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        match documents.iter_mut().find(|(k, _)| *k == key) {
            Some((_, product)) => {
                product.apply_stock_update(&update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, StoreError> {
        let key = native_key(id)?;
        let mut documents = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        match documents.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                documents.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
