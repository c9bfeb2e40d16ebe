//! # Cart
//!
//! The mutable per-session selection of products awaiting checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Command              Cart Method              Line Change           │
//! │  ──────────              ───────────              ───────────           │
//! │                                                                         │
//! │  AddItem ──────────────► add_item() ────────────► qty += n / push       │
//! │                                                                         │
//! │  SetQuantity ──────────► set_quantity() ────────► qty = n (0 removes)   │
//! │                                                                         │
//! │  RemoveItem ───────────► remove_item() ─────────► retain (no-op if     │
//! │                                                    absent)              │
//! │  ClearCart / checkout ─► clear() ───────────────► lines.clear()         │
//! │                                                                         │
//! │  GetCart ──────────────► totals() ──────────────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product increases quantity)
//! - Every line quantity is in `1..=MAX_ITEM_QUANTITY`
//! - At most `MAX_CART_ITEMS` lines
//! - The total at catalog prices always fits in `i64` cents
//! - A failing operation never modifies the cart
//!
//! Prices are not stored on lines. Totals are recomputed from the catalog on
//! every call, so the cart can never show a stale price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::ProductCatalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CartLine;
use crate::validation::{
    validate_add_quantity, validate_cart_size, validate_line_quantity, validate_set_quantity,
};

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    /// When the cart was created/last cleared
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds `quantity` units of a catalog product.
    ///
    /// ## Behavior
    /// - quantity <= 0: `InvalidQuantity`
    /// - product not in catalog: `UnknownProduct`
    /// - product already in cart: quantity increases
    /// - otherwise: new line appended
    /// - resulting total past `i64` cents: `TotalOverflow`
    pub fn add_item(
        &mut self,
        catalog: &ProductCatalog,
        product_id: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_add_quantity(quantity)?;
        ensure_known(catalog, product_id)?;

        let existing = self.quantity_of(product_id);
        if existing > 0 {
            let new_qty = existing + quantity;
            validate_line_quantity(new_qty)?;
            self.ensure_total_fits(catalog, product_id, new_qty)?;
            if let Some(line) = self.line_mut(product_id) {
                line.quantity = new_qty;
            }
            return Ok(());
        }

        validate_cart_size(self.lines.len())?;
        self.ensure_total_fits(catalog, product_id, quantity)?;
        self.lines.push(CartLine {
            product_id: product_id.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Removes a product's line. Removing an absent product does nothing.
    pub fn remove_item(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Sets the absolute quantity for a product.
    ///
    /// ## Behavior
    /// - quantity < 0: `InvalidQuantity`
    /// - quantity == 0: same as [`Cart::remove_item`]
    /// - product not in catalog: `UnknownProduct`
    /// - product not yet in cart: line is created
    pub fn set_quantity(
        &mut self,
        catalog: &ProductCatalog,
        product_id: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_set_quantity(quantity)?;

        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        ensure_known(catalog, product_id)?;
        self.ensure_total_fits(catalog, product_id, quantity)?;

        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
            return Ok(());
        }

        validate_cart_size(self.lines.len())?;
        self.lines.push(CartLine {
            product_id: product_id.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Grand total at current catalog prices.
    ///
    /// `TotalOverflow` if the amount doesn't fit in `i64` cents.
    pub fn total(&self, catalog: &ProductCatalog) -> CoreResult<Money> {
        sum_lines(
            catalog,
            self.lines.iter().map(|l| (l.product_id.as_str(), l.quantity)),
        )
    }

    /// Summary for the UI.
    pub fn totals(&self, catalog: &ProductCatalog) -> CoreResult<CartTotals> {
        Ok(CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            total_cents: self.total(catalog)?.cents(),
        })
    }

    /// Clears all lines and restarts the cart clock.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of a product in the cart (0 when absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Fails with `TotalOverflow` if setting `product_id` to `quantity`
    /// would push the total past `i64` cents.
    fn ensure_total_fits(
        &self,
        catalog: &ProductCatalog,
        product_id: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        let others = self
            .lines
            .iter()
            .filter(|l| l.product_id != product_id)
            .map(|l| (l.product_id.as_str(), l.quantity));
        sum_lines(catalog, others.chain(std::iter::once((product_id, quantity)))).map(|_| ())
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

fn sum_lines<'a, I>(catalog: &ProductCatalog, mut lines: I) -> CoreResult<Money>
where
    I: Iterator<Item = (&'a str, i64)>,
{
    lines.try_fold(Money::zero(), |total, (product_id, quantity)| {
        let price = catalog
            .get(product_id)
            .map_err(|_| CoreError::UnknownProduct(product_id.to_string()))?
            .price();
        price
            .checked_multiply_quantity(quantity)
            .and_then(|line_total| total.checked_add(line_total))
            .ok_or(CoreError::TotalOverflow)
    })
}

fn ensure_known(catalog: &ProductCatalog, product_id: &str) -> CoreResult<()> {
    if catalog.contains(product_id) {
        Ok(())
    } else {
        Err(CoreError::UnknownProduct(product_id.to_string()))
    }
}

/// Cart totals summary for UI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
