//! # Domain Types
//!
//! Core domain types used throughout Mango Mart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │    Receipt      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (unique)    │◄──│  product_id     │   │  id (UUID)      │       │
//! │  │  name           │   │  quantity > 0   │   │  receipt_number │       │
//! │  │  price_cents    │   └─────────────────┘   │  lines[]        │       │
//! │  │  stock_quantity │                         │  grand_total    │       │
//! │  └────────┬────────┘                         │  created_at     │       │
//! │           │ snapshot                         └────────┬────────┘       │
//! │           │            ┌─────────────────┐            │                │
//! │           └───────────►│  ReceiptLine    │◄───────────┘                │
//! │                        │  product (copy) │                             │
//! │                        │  quantity       │                             │
//! │                        │  line_total     │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Receipt lines hold a full copy of the product as it was at checkout, so a
//! receipt keeps reading the same even if the catalog source changes on the
//! next load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: String,

    /// Display name shown in the storefront and on receipts.
    pub name: String,

    /// Optional blurb for product details.
    #[serde(default)]
    pub description: Option<String>,

    /// Price in cents (never negative).
    pub price_cents: i64,

    /// Units on hand when the catalog was loaded.
    pub stock_quantity: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product in the cart. The cart keeps at most one line per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    /// Always > 0 while the line is in a cart.
    pub quantity: i64,
}

// =============================================================================
// Receipt
// =============================================================================

/// A line on a receipt.
/// Uses snapshot pattern to freeze product data at time of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    product: Product,
    quantity: i64,
    line_total_cents: i64,
}

impl ReceiptLine {
    /// Freezes `product` and prices the line with its current price.
    pub fn new(product: Product, quantity: i64) -> CoreResult<Self> {
        let line_total_cents = product
            .price()
            .checked_multiply_quantity(quantity)
            .ok_or(CoreError::TotalOverflow)?
            .cents();
        Ok(ReceiptLine {
            product,
            quantity,
            line_total_cents,
        })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn line_total_cents(&self) -> i64 {
        self.line_total_cents
    }

    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// Immutable record of a completed checkout.
///
/// There are no setters; the only way to obtain a `Receipt` is a successful
/// checkout (or deserializing one that was logged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    id: String,
    receipt_number: String,
    lines: Vec<ReceiptLine>,
    grand_total_cents: i64,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl Receipt {
    /// Builds a receipt from already-priced lines.
    pub(crate) fn from_lines(lines: Vec<ReceiptLine>) -> CoreResult<Self> {
        let grand_total_cents = Money::checked_sum(lines.iter().map(ReceiptLine::line_total))
            .ok_or(CoreError::TotalOverflow)?
            .cents();
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        Ok(Receipt {
            id: id.to_string(),
            receipt_number: receipt_number(created_at, &id),
            lines,
            grand_total_cents,
            created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable number printed on the receipt.
    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn grand_total_cents(&self) -> i64 {
        self.grand_total_cents
    }

    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// `MM-YYMMDD-HHMMSS-xxxx`, the suffix taken from the receipt UUID.
fn receipt_number(at: DateTime<Utc>, id: &Uuid) -> String {
    let simple = id.simple().to_string();
    format!("MM-{}-{}", at.format("%y%m%d-%H%M%S"), &simple[..4])
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            price_cents,
            stock_quantity: 10,
        }
    }

    #[test]
    fn test_receipt_line_total() {
        let line = ReceiptLine::new(product("A", 500), 3).unwrap();
        assert_eq!(line.line_total_cents(), 1500);
        assert_eq!(line.product().id, "A");
    }

    #[test]
    fn test_receipt_grand_total() {
        let receipt = Receipt::from_lines(vec![
            ReceiptLine::new(product("A", 500), 2).unwrap(),
            ReceiptLine::new(product("B", 199), 1).unwrap(),
        ])
        .unwrap();
        assert_eq!(receipt.grand_total_cents(), 1199);
        assert_eq!(receipt.lines().len(), 2);
        assert!(receipt.receipt_number().starts_with("MM-"));
        assert_eq!(receipt.receipt_number().len(), "MM-YYMMDD-HHMMSS-xxxx".len());
    }

    #[test]
    fn test_product_json_shape() {
        let json = r#"{"id":"A","name":"Alphonso","priceCents":500,"stockQuantity":2}"#;
        let parsed: Product = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.price().cents(), 500);
        assert_eq!(parsed.description, None);
    }

    #[test]
    fn test_overflowing_line_and_grand_total() {
        let big = product("BIG", i64::MAX);
        assert_eq!(
            ReceiptLine::new(big.clone(), 2),
            Err(CoreError::TotalOverflow)
        );

        let lines = vec![
            ReceiptLine::new(big, 1).unwrap(),
            ReceiptLine::new(product("A", 500), 1).unwrap(),
        ];
        assert_eq!(Receipt::from_lines(lines), Err(CoreError::TotalOverflow));
    }
}
