//! HTTP bindings for the product endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stocktake_core::DocumentId;
use stocktake_products::Product;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Body of a create request.
///
/// Numbers that failed to parse from the form are sent as `null`, which the
/// server rejects as a missing field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRequest {
    #[serde(rename = "productName")]
    pub product_name: String,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

/// Body of an update request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpdateRequest {
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

/// The four product operations as seen from the client.
#[async_trait::async_trait]
pub trait ProductService: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ClientError>;
    async fn create(&self, request: &CreateRequest) -> Result<Product, ClientError>;
    async fn update(&self, id: &DocumentId, request: &UpdateRequest) -> Result<(), ClientError>;
    async fn delete(&self, id: &DocumentId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ListBody {
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    data: Product,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// reqwest-backed client for the product endpoints.
#[derive(Debug, Clone)]
pub struct ProductClient {
    api_url: String,
    http: reqwest::Client,
}

impl ProductClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(api_url, reqwest::Client::new())
    }

    pub fn with_client(api_url: impl Into<String>, http: reqwest::Client) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { api_url, http }
    }

    fn products_url(&self) -> String {
        format!("{}/api/product", self.api_url)
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn check_connectivity(&self) -> bool {
        let url = format!("{}/health", self.api_url);
        matches!(self.http.get(&url).send().await, Ok(r) if r.status().is_success())
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);
        Err(ClientError::Api(status, message))
    }
}

#[async_trait::async_trait]
impl ProductService for ProductClient {
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let resp = self.send(self.http.get(self.products_url())).await?;
        let body: ListBody = resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.products)
    }

    async fn create(&self, request: &CreateRequest) -> Result<Product, ClientError> {
        let resp = self.send(self.http.post(self.products_url()).json(request)).await?;
        let body: CreatedBody = resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.data)
    }

    async fn update(&self, id: &DocumentId, request: &UpdateRequest) -> Result<(), ClientError> {
        let req = self
            .http
            .put(self.products_url())
            .query(&[("id", id.as_str())])
            .json(request);
        self.send(req).await.map(|_| ())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), ClientError> {
        let req = self.http.delete(self.products_url()).query(&[("id", id.as_str())]);
        self.send(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unparsed_numbers_serialize_as_null() {
        let req = CreateRequest {
            product_name: "Bolt".to_string(),
            quantity: None,
            price: Some(1.5),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"productName": "Bolt", "quantity": null, "price": 1.5})
        );
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = ProductClient::new("http://example.test/");
        assert_eq!(client.products_url(), "http://example.test/api/product");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = ProductClient::new("http://127.0.0.1:1");
        assert!(matches!(client.list().await, Err(ClientError::Network(_))));
        assert!(!client.check_connectivity().await);
    }
}
