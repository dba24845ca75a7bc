//! Infrastructure layer: document store connection and product collections.

pub mod collection;
pub mod connector;
pub mod store;

pub use collection::CollectionName;
pub use connector::{ConnectorError, PgConnector};
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
