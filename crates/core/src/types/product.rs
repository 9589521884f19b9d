//! Catalog types served by the product/stock API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;

/// A product as served by `GET /products/{id}`.
///
/// Only `id` is interpreted. Every other attribute is kept verbatim in
/// `attributes` so any catalog shape survives a trip through the durable
/// store unchanged; the accessors read the common ones leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog ID.
    pub id: ProductId,
    /// All other attributes, passed through verbatim.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// A product with no attributes besides its ID.
    #[must_use]
    pub fn with_id(id: ProductId) -> Self {
        Self {
            id,
            attributes: Map::new(),
        }
    }

    /// A product with the usual storefront attributes.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Price,
        image: impl Into<String>,
    ) -> Self {
        Self::with_id(id)
            .with_attribute("title", title.into())
            .with_attribute("price", price.to_json())
            .with_attribute("image", image.into())
    }

    /// Set `key` to `value`, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Display name, from `title` or else `name`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.text("title").or_else(|| self.text("name"))
    }

    /// Unit price, if the `price` attribute holds a number or numeric string.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.attributes.get("price").and_then(Price::from_json)
    }

    /// Image URL.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.text("image")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// Stock level for a product.
///
/// The catalog answers `GET /stock/{id}` with `{ "amount": n }`; the ID is
/// the one that was asked for. `amount` is the maximum purchasable quantity.
/// It is authoritative at the catalog and must be fetched fresh for every
/// check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stock {
    /// Catalog ID of the product.
    pub id: ProductId,
    /// Units available.
    pub amount: i64,
}

impl Stock {
    /// Whether `requested` units can be purchased.
    #[must_use]
    pub const fn allows(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}
