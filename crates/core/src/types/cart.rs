//! Cart line items and the ordered cart itself.
//!
//! Every transition here is pure: it takes the current cart by reference and
//! returns the next one, leaving the original untouched. Callers persist the
//! result and only then swap it in, so a failed persist never leaves a
//! half-applied cart behind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// A cart invariant that a set of line items violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// Two line items share a product ID.
    #[error("duplicate line item for product {0}")]
    DuplicateItem(ProductId),

    /// A line item would hold zero units.
    #[error("line item for product {0} has a zero amount")]
    ZeroAmount(ProductId),
}

/// One product in the cart with its requested quantity.
///
/// Serialized as the product object with an extra `amount` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product attributes, as they were when the item was first added.
    #[serde(flatten)]
    pub product: Product,
    /// Requested units (always at least 1).
    pub amount: u32,
}

impl LineItem {
    /// A new line item holding a single unit.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self { product, amount: 1 }
    }

    /// Product ID of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    ///
    /// `None` if the product has no readable price or the multiplication overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.product.price()?.checked_times(self.amount)
    }
}

/// Ordered collection of line items, at most one per product.
///
/// Order is the order in which products were first added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line item for `id`, if any.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// A cart with `product` appended as a single-unit line.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` if the product already has a line.
    pub fn with_appended(&self, product: Product) -> Result<Self, CartInvariantError> {
        if self.contains(product.id) {
            return Err(CartInvariantError::DuplicateItem(product.id));
        }

        let mut items = self.items.clone();
        items.push(LineItem::new(product));
        Ok(Self { items })
    }

    /// A cart where the line for `id` holds `amount` units.
    ///
    /// Every other line is carried over unchanged. If `id` has no line the
    /// result equals the current cart.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` if `amount` is 0.
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Result<Self, CartInvariantError> {
        if amount == 0 {
            return Err(CartInvariantError::ZeroAmount(id));
        }

        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id() == id {
                    LineItem {
                        product: item.product.clone(),
                        amount,
                    }
                } else {
                    item.clone()
                }
            })
            .collect();

        Ok(Self { items })
    }

    /// A cart without the line for `id`, or `None` if there is no such line.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }

        let items = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();

        Some(Self { items })
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals, or `None` if any line has no subtotal.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |total, item| total.checked_add(item.subtotal()?))
    }

    /// Amount in the cart for each product.
    #[must_use]
    pub fn amounts(&self) -> BTreeMap<ProductId, u32> {
        self.items
            .iter()
            .map(|item| (item.id(), item.amount))
            .collect()
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartInvariantError::ZeroAmount(item.id()));
            }
            if !seen.insert(item.id()) {
                return Err(CartInvariantError::DuplicateItem(item.id()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
