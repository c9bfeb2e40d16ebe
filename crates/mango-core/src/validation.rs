//! # Validation Module
//!
//! Input validation for catalog records and cart quantities.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load                                                 │
//! │  └── validate_product: id, name, price, stock                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart operations                                              │
//! │  └── validate_add_quantity / validate_set_quantity                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout                                                     │
//! │  └── stock re-check against current inventory                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mango_core::validation::{validate_product_id, validate_add_quantity};
//!
//! assert!(validate_product_id("MANGO-KENT").is_ok());
//! assert!(validate_add_quantity(5).is_ok());
//! assert!(validate_add_quantity(0).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_ID_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product id.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use mango_core::validation::validate_product_id;
///
/// assert!(validate_product_id("A").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("has space").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: MAX_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed.
///
/// Empty is fine (matches everything); longer than 100 characters is not.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "priceCents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock_quantity(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stockQuantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates every field of a catalog record.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_id(&product.id)?;
    validate_product_name(&product.name)?;
    validate_price_cents(product.price_cents)?;
    validate_stock_quantity(product.stock_quantity)?;
    Ok(())
}

// =============================================================================
// Cart Quantity Validators
// =============================================================================

/// Validates a quantity being added to the cart.
///
/// ```text
/// add_item("A", qty)
///      │
///      ├── qty <= 0   → InvalidQuantity
///      ├── qty > 999  → QuantityTooLarge
///      └── OK
/// ```
pub fn validate_add_quantity(qty: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(CoreError::InvalidQuantity { quantity: qty });
    }
    validate_line_quantity(qty)
}

/// Validates an absolute line quantity. Zero means "remove the line".
pub fn validate_set_quantity(qty: i64) -> CoreResult<()> {
    if qty < 0 {
        return Err(CoreError::InvalidQuantity { quantity: qty });
    }
    validate_line_quantity(qty)
}

/// Upper bound shared by add and set.
pub fn validate_line_quantity(qty: i64) -> CoreResult<()> {
    if qty > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: qty,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Checks there is room for one more distinct line.
pub fn validate_cart_size(current_items: usize) -> CoreResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("MANGO-KENT").is_ok());
        assert!(validate_product_id("a_1").is_ok());

        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id("has space").is_err());
        assert!(validate_product_id(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Alphonso Mango").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  kent ").unwrap(), "kent");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(-1).is_err());
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_add_quantity() {
        assert!(validate_add_quantity(1).is_ok());
        assert!(validate_add_quantity(999).is_ok());
        assert_eq!(
            validate_add_quantity(0),
            Err(CoreError::InvalidQuantity { quantity: 0 })
        );
        assert!(matches!(
            validate_add_quantity(1000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_set_quantity_allows_zero() {
        assert!(validate_set_quantity(0).is_ok());
        assert_eq!(
            validate_set_quantity(-1),
            Err(CoreError::InvalidQuantity { quantity: -1 })
        );
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }
}
