//! REST client for the catalog/stock API.
//!
//! Uses `reqwest` for HTTP. Products can be cached with `moka` when a TTL is
//! configured (off by default); stock requests always go to the network.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::{Product, ProductId, Stock};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// Longest slice of an error body kept in errors and logs.
const ERROR_BODY_LIMIT: usize = 200;

/// Body of `GET /stock/{id}`. Any other fields are ignored.
#[derive(Debug, Deserialize)]
struct StockLevel {
    amount: i64,
}

/// Client for the catalog/stock API.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Option<Cache<ProductId, Product>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API token is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| {
                    CatalogError::InvalidConfig(format!("Invalid API token format: {e}"))
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let products = (!config.product_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(config.product_cache_capacity)
                .time_to_live(config.product_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// URL of `{resource}/{id}` under the base URL.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("{resource}/{id}"))?)
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = self.endpoint(resource, id)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("{resource} {id}")));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: truncate(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&response_text),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        let level: StockLevel = self.get_json("stock", id).await?;
        Ok(Stock {
            id,
            amount: level.amount,
        })
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let Some(cache) = &self.inner.products else {
            return self.fetch_product(id).await;
        };

        // Check cache
        if let Some(product) = cache.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product = self.fetch_product(id).await?;
        cache.insert(id, product.clone()).await;
        Ok(product)
    }
}

impl CatalogClient {
    /// GET a product, keyed by the requested ID whatever the body says.
    async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let mut product: Product = self.get_json("products", id).await?;
        if product.id != id {
            tracing::warn!(body_id = %product.id, "Catalog returned a product under another ID");
            product.id = id;
        }
        Ok(product)
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
