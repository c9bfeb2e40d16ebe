//! # Checkout Flow
//!
//! Turns a cart into an immutable [`Receipt`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       checkout(cart, catalog, stock)                    │
//! │                                                                         │
//! │  cart empty? ─────────────────────────────────────────► EmptyCart       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line (read only):                                            │
//! │    catalog.get(id) ── missing ────────────────────────► UnknownProduct  │
//! │    stock.available(id) < qty ─────────────────────────► OutOfStock      │
//! │    snapshot product at current price                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ── commit point ──  build Receipt, cart.clear()                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All validation happens in [`prepare`] before the cart is touched, so a
//! failed checkout leaves the cart exactly as it was.

use std::collections::HashMap;

use crate::cart::Cart;
use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult};
use crate::types::{Receipt, ReceiptLine};

// =============================================================================
// Stock Lookup
// =============================================================================

/// Source of current stock levels consulted at checkout.
///
/// `None` means the source has no record for the product, which checkout
/// treats as zero available.
pub trait StockLookup {
    fn available(&self, product_id: &str) -> Option<i64>;
}

/// The catalog's own snapshot of stock, for setups without a live inventory.
impl StockLookup for ProductCatalog {
    fn available(&self, product_id: &str) -> Option<i64> {
        self.get(product_id).ok().map(|p| p.stock_quantity)
    }
}

/// Levels already resolved from an external inventory service.
impl StockLookup for HashMap<String, i64> {
    fn available(&self, product_id: &str) -> Option<i64> {
        self.get(product_id).copied()
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Validates every cart line and prices it, without mutating anything.
pub fn prepare<S>(cart: &Cart, catalog: &ProductCatalog, stock: &S) -> CoreResult<Vec<ReceiptLine>>
where
    S: StockLookup + ?Sized,
{
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    cart.lines()
        .iter()
        .map(|line| {
            let product = catalog
                .get(&line.product_id)
                .map_err(|_| CoreError::UnknownProduct(line.product_id.clone()))?;

            let available = stock.available(&line.product_id).unwrap_or(0);
            if line.quantity > available {
                return Err(CoreError::OutOfStock {
                    product_id: line.product_id.clone(),
                    available,
                    requested: line.quantity,
                });
            }

            ReceiptLine::new(product.clone(), line.quantity)
        })
        .collect()
}

/// Runs the checkout: validate, build the receipt, clear the cart.
///
/// Either a full receipt comes back and the cart is empty, or an error comes
/// back and the cart is unchanged.
///
/// ```rust
/// use mango_core::{checkout, Cart, ProductCatalog};
///
/// let catalog = ProductCatalog::from_json(
///     r#"[{"id":"A","name":"Alphonso","priceCents":500,"stockQuantity":2}]"#,
/// ).unwrap();
/// let mut cart = Cart::new();
/// cart.add_item(&catalog, "A", 2).unwrap();
///
/// let receipt = checkout::checkout(&mut cart, &catalog, &catalog).unwrap();
/// assert_eq!(receipt.grand_total_cents(), 1000);
/// assert!(cart.is_empty());
/// ```
pub fn checkout<S>(cart: &mut Cart, catalog: &ProductCatalog, stock: &S) -> CoreResult<Receipt>
where
    S: StockLookup + ?Sized,
{
    let lines = prepare(cart, catalog, stock)?;
    let receipt = Receipt::from_lines(lines)?;
    cart.clear();
    Ok(receipt)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            price_cents,
            stock_quantity: stock,
        }
    }

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(vec![product("A", 500, 2), product("B", 199, 10)]).unwrap()
    }

    #[test]
    fn test_checkout_produces_receipt_and_clears_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, "A", 2).unwrap();

        let receipt = checkout(&mut cart, &catalog, &catalog).unwrap();

        assert_eq!(receipt.grand_total_cents(), 1000);
        assert_eq!(receipt.lines().len(), 1);
        assert_eq!(receipt.lines()[0].quantity(), 2);
        assert_eq!(receipt.lines()[0].product().name, "Product A");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_out_of_stock_leaves_cart_unchanged() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, "B", 1).unwrap();
        cart.add_item(&catalog, "A", 3).unwrap();
        let before = cart.clone();

        let err = checkout(&mut cart, &catalog, &catalog).unwrap_err();

        assert_eq!(
            err,
            CoreError::OutOfStock {
                product_id: "A".to_string(),
                available: 2,
                requested: 3,
            }
        );
        assert_eq!(cart, before);
        assert_eq!(cart.quantity_of("A"), 3);
    }

    #[test]
    fn test_empty_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();

        assert_eq!(
            checkout(&mut cart, &catalog, &catalog).unwrap_err(),
            CoreError::EmptyCart
        );
    }

    #[test]
    fn test_live_stock_overrides_catalog_snapshot() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, "B", 5).unwrap();

        let mut live = HashMap::new();
        live.insert("B".to_string(), 4);

        let err = checkout(&mut cart, &catalog, &live).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { available: 4, .. }));

        live.insert("B".to_string(), 5);
        let receipt = checkout(&mut cart, &catalog, &live).unwrap();
        assert_eq!(receipt.grand_total_cents(), 995);
    }

    #[test]
    fn test_missing_stock_record_counts_as_zero() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_item(&catalog, "B", 1).unwrap();

        let live: HashMap<String, i64> = HashMap::new();
        let err = checkout(&mut cart, &catalog, &live).unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { available: 0, .. }));
        assert_eq!(cart.quantity_of("B"), 1);
    }

    #[test]
    fn test_receipt_uses_catalog_price_at_checkout() {
        let old = catalog();
        let mut cart = Cart::new();
        cart.add_item(&old, "B", 2).unwrap();

        // Same ids, new price list.
        let repriced =
            ProductCatalog::new(vec![product("A", 500, 2), product("B", 250, 10)]).unwrap();

        let receipt = checkout(&mut cart, &repriced, &repriced).unwrap();
        assert_eq!(receipt.grand_total_cents(), 500);
        assert_eq!(receipt.lines()[0].product().price_cents, 250);
    }
}
