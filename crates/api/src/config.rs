//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `STOCKTAKE_BIND_ADDR` | `0.0.0.0:8080` | listen address |
//! | `USE_PERSISTENT_STORES` | `false` | Postgres instead of the in-memory collection |
//! | `DATABASE_URL` | (none) | required when persistent |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | pool size |
//! | `STOCKTAKE_COLLECTION` | `products` | collection (table) name |

use std::net::SocketAddr;

use thiserror::Error;

use stocktake_infra::CollectionName;
use stocktake_infra::collection::InvalidCollectionName;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,

    #[error(transparent)]
    Collection(#[from] InvalidCollectionName),
}

/// Where product documents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub collection: CollectionName,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("STOCKTAKE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            var: "STOCKTAKE_BIND_ADDR",
            expected: "socket address",
            value: bind_addr.clone(),
        })?;

        let persistent = match lookup("USE_PERSISTENT_STORES") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                expected: "boolean",
                value: v,
            })?,
            None => false,
        };

        let store = if persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                Some(v) => v
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or(ConfigError::Invalid {
                        var: "DATABASE_MAX_CONNECTIONS",
                        expected: "positive integer",
                        value: v,
                    })?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            StoreBackend::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StoreBackend::InMemory
        };

        let collection = match lookup("STOCKTAKE_COLLECTION") {
            Some(name) => CollectionName::new(name)?,
            None => CollectionName::default(),
        };

        Ok(Self {
            bind_addr,
            store,
            collection,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
