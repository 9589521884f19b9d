//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! rs-cart show
//! rs-cart add 1
//! rs-cart update 1 3
//! rs-cart remove 1
//! ```

use std::fmt::Write as _;

use rocketshoes_cart::{CartOutcome, CartStore, UpdateItemAmount};
use rocketshoes_core::{Cart, LineItem, Price, ProductId};

/// Placeholder for values the catalog did not provide.
const UNKNOWN: &str = "?";

/// Print the cart.
pub fn show(store: &CartStore) {
    let rendered = render_cart(&store.cart());

    #[allow(clippy::print_stdout)]
    {
        print!("{rendered}");
    }
}

/// Add one unit of `product_id`.
pub async fn add(store: &CartStore, product_id: ProductId) -> CartOutcome {
    let outcome = store.add_item(product_id).await;
    report(store, product_id, outcome);
    outcome
}

/// Remove `product_id` from the cart.
pub fn remove(store: &CartStore, product_id: ProductId) -> CartOutcome {
    let outcome = store.remove_item(product_id);
    if outcome == CartOutcome::Updated {
        #[allow(clippy::print_stdout)]
        {
            println!("Removed product {product_id}");
        }
    }
    outcome
}

/// Set the quantity of `product_id`.
pub async fn update(store: &CartStore, product_id: ProductId, amount: i64) -> CartOutcome {
    let outcome = store
        .update_item_amount(UpdateItemAmount { product_id, amount })
        .await;
    if outcome == CartOutcome::Ignored {
        tracing::info!(%product_id, amount, "Quantity below 1 ignored");
    }
    report(store, product_id, outcome);
    outcome
}

/// Print the resulting line after a successful add or update.
fn report(store: &CartStore, product_id: ProductId, outcome: CartOutcome) {
    if outcome != CartOutcome::Updated {
        return;
    }

    let cart = store.cart();
    let Some(item) = cart.get(product_id) else {
        return;
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{} x {} ({})", item.amount, title(item), item.id());
    }
}

/// Text listing of a cart: one block per line item, then the total.
fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let id = item.id().to_string();
        let _ = writeln!(out, "#{id:<4} {}", title(item));
        let _ = writeln!(
            out,
            "      {} x {} = {}",
            item.amount,
            money(item.product.price()),
            money(item.subtotal())
        );
    }

    let units = cart.total_units();
    let _ = writeln!(
        out,
        "Total: {} ({units} {})",
        money(cart.total()),
        if units == 1 { "item" } else { "items" }
    );
    out
}

fn title(item: &LineItem) -> &str {
    item.product.title().unwrap_or(UNKNOWN)
}

/// `R$ 12.34`, or a placeholder when the amount is unknown or overflowed.
fn money(price: Option<Price>) -> String {
    price.map_or_else(|| format!("R$ {UNKNOWN}"), |price| format!("R$ {price}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::Product;

    use super::*;

    fn line(id: i64, title: &str, cents: i64, amount: u32) -> LineItem {
        LineItem {
            product: Product::new(
                ProductId::new(id),
                title,
                Price::from_cents(cents),
                format!("https://rocketseat.test/{id}.jpg"),
            ),
            amount,
        }
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_cart_lists_lines_and_total() {
        let cart = Cart::try_from(vec![
            line(1, "Tênis de Caminhada Leve Confortável", 17_990, 2),
            line(3, "Tênis Adidas Duramo Lite 2.0", 21_990, 1),
        ])
        .unwrap();

        let rendered = render_cart(&cart);

        assert_eq!(
            rendered,
            "#1    Tênis de Caminhada Leve Confortável\n\
             \x20     2 x R$ 179.90 = R$ 359.80\n\
             #3    Tênis Adidas Duramo Lite 2.0\n\
             \x20     1 x R$ 219.90 = R$ 219.90\n\
             Total: R$ 579.70 (3 items)\n"
        );
    }

    #[test]
    fn test_render_cart_without_readable_prices() {
        let cart = Cart::try_from(vec![
            LineItem {
                product: Product::with_id(ProductId::new(5)).with_attribute("name", "Brinde"),
                amount: 1,
            },
            LineItem {
                product: Product::with_id(ProductId::new(6)).with_attribute("price", 1e20),
                amount: u32::MAX,
            },
        ])
        .unwrap();

        let rendered = render_cart(&cart);

        assert!(rendered.starts_with("#5    Brinde\n      1 x R$ ? = R$ ?\n"));
        assert!(rendered.contains("#6    ?\n"));
        assert!(rendered.ends_with("Total: R$ ? (4294967296 items)\n"));
    }

    #[test]
    fn test_render_single_unit_total() {
        let cart = Cart::try_from(vec![line(2, "Tênis VR Caminhada", 13_990, 1)]).unwrap();
        assert!(render_cart(&cart).ends_with("Total: R$ 139.90 (1 item)\n"));
    }
}
