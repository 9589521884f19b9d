//! Catalog/stock API access.
//!
//! # Architecture
//!
//! - The catalog is the source of truth for product metadata and stock
//! - [`Catalog`] is the seam the cart depends on; tests substitute fakes
//! - [`CatalogClient`] talks to the REST API with `reqwest`
//! - Product metadata is cached via `moka`; stock is never cached
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` → `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` → `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::catalog::{Catalog, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let stock = client.stock(ProductId::new(1)).await?;
//! let product = client.product(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client configuration was rejected (e.g. a malformed token).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Read-only access to product metadata and stock levels.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Current stock for a product. Implementations must not cache this.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;

    /// Product metadata.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("stock 7".to_string());
        assert_eq!(err.to_string(), "Not found: stock 7");

        let err = CatalogError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 502 - bad gateway");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CatalogError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
