//! Cart state container.
//!
//! [`CartStore`] holds the shopper's cart in memory and mirrors it to a
//! durable key-value store on every successful mutation. Each mutation is a
//! single read-modify-write:
//!
//! 1. snapshot the in-memory cart
//! 2. consult the catalog if needed (the only suspension point)
//! 3. compute the next cart from the snapshot
//! 4. write the full serialized cart to the durable store
//! 5. swap the in-memory cart
//!
//! Any failure before step 5 leaves both copies untouched and is reported
//! through the injected [`Notifier`]. Concurrent mutations each work from
//! their own snapshot, so the last one to persist wins.

use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{Cart, ProductId};
use tracing::instrument;

use crate::catalog::Catalog;
use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::{CartError, Result};
use crate::notify::{CartAction, NoticeKind, Notifier, notice_message};
use crate::storage::KeyValueStore;

/// What a cart mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// The cart was persisted and replaced.
    Updated,
    /// The request was benign and ignored; nothing was written.
    Ignored,
    /// The mutation was aborted and a notice of this kind was emitted.
    Rejected(NoticeKind),
}

/// Request to set a line item's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateItemAmount {
    pub product_id: ProductId,
    /// Requested units. Values below 1 are ignored.
    pub amount: i64,
}

enum Change {
    Committed,
    Skipped,
}

/// Shopping-cart state, persisted on every change.
///
/// Cheap to clone; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Load the cart stored under the default key.
    ///
    /// A missing, unreadable or corrupt entry yields an empty cart without
    /// any notice.
    #[must_use]
    pub fn load(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::load_with_key(catalog, storage, notifier, DEFAULT_STORAGE_KEY)
    }

    /// Load the cart stored under `key`.
    #[must_use]
    pub fn load_with_key(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let cart = read_persisted(storage.as_ref(), &key);
        tracing::debug!(key = %key, items = cart.len(), "Cart loaded");

        Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                notifier,
                key,
                cart: RwLock::new(cart),
            }),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner
            .cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is fetched from the catalog and appended
    /// with amount 1. A product already in the cart gains one unit if stock
    /// allows; its other attributes stay as they were when first added.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_item(&self, product_id: ProductId) -> CartOutcome {
        let result = self.try_add_item(product_id).await;
        self.settle(CartAction::Add, product_id, result)
    }

    /// Remove a product's line entirely.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&self, product_id: ProductId) -> CartOutcome {
        let result = self.try_remove_item(product_id);
        self.settle(CartAction::Remove, product_id, result)
    }

    /// Set a product's quantity.
    ///
    /// Amounts below 1 are silently ignored. Updating a product that is not
    /// in the cart rewrites the unchanged cart without a notice.
    #[instrument(
        skip(self),
        fields(product_id = %request.product_id, amount = request.amount)
    )]
    pub async fn update_item_amount(&self, request: UpdateItemAmount) -> CartOutcome {
        let result = self.try_update_item_amount(request).await;
        self.settle(CartAction::Update, request.product_id, result)
    }

    async fn try_add_item(&self, product_id: ProductId) -> Result<Change> {
        let current = self.cart();
        let stock = self.inner.catalog.stock(product_id).await?;

        let next = match current.get(product_id) {
            None => {
                let product = self.inner.catalog.product(product_id).await?;
                current.with_appended(product)?
            }
            Some(item) => {
                let requested = i64::from(item.amount) + 1;
                if !stock.allows(requested) {
                    return Err(CartError::StockExceeded {
                        product_id,
                        requested,
                        available: stock.amount,
                    });
                }
                let amount = u32::try_from(requested)
                    .map_err(|_| CartError::InvalidAmount(requested))?;
                current.with_amount(product_id, amount)?
            }
        };

        self.commit(next)?;
        Ok(Change::Committed)
    }

    fn try_remove_item(&self, product_id: ProductId) -> Result<Change> {
        let next = self
            .cart()
            .without(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(next)?;
        Ok(Change::Committed)
    }

    async fn try_update_item_amount(&self, request: UpdateItemAmount) -> Result<Change> {
        let UpdateItemAmount { product_id, amount } = request;
        if amount < 1 {
            return Ok(Change::Skipped);
        }

        let current = self.cart();
        let stock = self.inner.catalog.stock(product_id).await?;

        if !stock.allows(amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        let amount = u32::try_from(amount).map_err(|_| CartError::InvalidAmount(amount))?;
        let next = current.with_amount(product_id, amount)?;

        self.commit(next)?;
        Ok(Change::Committed)
    }

    /// Persist `next`, then make it the in-memory cart.
    fn commit(&self, next: Cart) -> Result<()> {
        let serialized = serde_json::to_string(&next)?;
        self.inner.storage.set_item(&self.inner.key, &serialized)?;

        *self
            .inner
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    /// Turn an operation result into an outcome, notifying on failure.
    fn settle(
        &self,
        action: CartAction,
        product_id: ProductId,
        result: Result<Change>,
    ) -> CartOutcome {
        match result {
            Ok(Change::Committed) => {
                tracing::debug!(?action, %product_id, "Cart updated");
                CartOutcome::Updated
            }
            Ok(Change::Skipped) => {
                tracing::debug!(?action, %product_id, "Cart request ignored");
                CartOutcome::Ignored
            }
            Err(err) => {
                let kind = err.notice_kind();
                if kind == NoticeKind::Failed {
                    tracing::error!(?action, %product_id, error = %err, "Cart operation failed");
                } else {
                    tracing::info!(?action, %product_id, reason = %err, "Cart operation rejected");
                }
                self.inner.notifier.notify(kind, notice_message(kind, action));
                CartOutcome::Rejected(kind)
            }
        }
    }
}

/// Cart stored under `key`, or an empty cart if absent or unusable.
fn read_persisted(storage: &dyn KeyValueStore, key: &str) -> Cart {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key = %key, error = %e, "Stored cart is corrupt, starting empty");
        Cart::new()
    })
}
