use serde::Serialize;

use stocktake_core::{DocumentId, DomainResult};
use stocktake_products::Product;

/// Fixed response messages (part of the wire contract).
pub mod messages {
    pub const FETCHED: &str = "Products fetched successfully";
    pub const ADDED: &str = "Product added successfully";
    pub const UPDATED: &str = "Product updated successfully";
    pub const DELETED: &str = "Product deleted successfully";

    pub const MISSING_FIELDS: &str = "Missing required fields";
    pub const ID_REQUIRED: &str = "Product ID is required";
    pub const NOT_FOUND: &str = "Product not found";
    pub const INVALID_BODY: &str = "Invalid request body";
    pub const INVALID_QUERY: &str = "Invalid query string";

    pub const FETCH_FAILED: &str = "Error fetching products";
    pub const PROCESSING_FAILED: &str = "Error processing request";
    pub const DELETE_FAILED: &str = "Error processing delete request";
}

// -------------------------
// Request DTOs
// -------------------------

/// `?id=` addressing for update/delete.
///
/// Only the first `id` pair counts; later repeats are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let id = pairs.into_iter().find(|(k, _)| k == "id").map(|(_, v)| v);
        Self { id }
    }

    /// The addressed document. An absent or empty id is a missing field.
    pub fn document_id(&self) -> DomainResult<DocumentId> {
        self.id.as_deref().unwrap_or_default().parse()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub message: &'static str,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub data: Product,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocktake_core::DomainError;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn first_id_wins() {
        let query = IdQuery::from_pairs(pairs(&[("x", "1"), ("id", "first"), ("id", "second")]));
        assert_eq!(query.document_id().unwrap().as_str(), "first");
    }

    #[test]
    fn absent_or_empty_id_is_missing() {
        for raw in [&[][..], &[("id", "")][..], &[("ids", "abc")][..]] {
            assert_eq!(
                IdQuery::from_pairs(pairs(raw)).document_id(),
                Err(DomainError::MissingField("id"))
            );
        }
    }
}
