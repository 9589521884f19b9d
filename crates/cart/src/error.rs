//! Cart operation errors.
//!
//! Provides the `CartError` type every fallible step of a cart mutation
//! returns. Errors stop at the `CartStore` operation boundary, where each is
//! turned into a user-facing notice; none escape to the caller.

use rocketshoes_core::{CartInvariantError, ProductId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::notify::NoticeKind;
use crate::storage::StorageError;

/// Failure of a single cart mutation.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity is above the available stock.
    #[error("requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested quantity cannot be held by a line item.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// Catalog API call failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Durable store read or write failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The resulting cart would break an invariant.
    #[error("Invalid cart: {0}")]
    Invariant(#[from] CartInvariantError),
}

impl CartError {
    /// Notice category shown to the user for this error.
    #[must_use]
    pub const fn notice_kind(&self) -> NoticeKind {
        match self {
            Self::StockExceeded { .. } => NoticeKind::StockExceeded,
            Self::NotInCart(_) => NoticeKind::NotFound,
            Self::InvalidAmount(_)
            | Self::Catalog(_)
            | Self::Storage(_)
            | Self::Serialize(_)
            | Self::Invariant(_) => NoticeKind::Failed,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
