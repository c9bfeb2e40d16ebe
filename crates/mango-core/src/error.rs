//! # Error Types
//!
//! Domain-specific error types for mango-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mango-core errors (this file)                                         │
//! │  ├── CoreError        - Catalog, cart and checkout failures            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mango-bundle errors (app crate)                                       │
//! │  ├── BundleError      - Startup failures (config, catalog load)        │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable. An operation that returns an error has left
//! the catalog, the cart and any receipt untouched.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Catalog lookup for an id that does not exist.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// A cart operation referenced a product the catalog doesn't carry.
    ///
    /// Distinct from [`CoreError::NotFound`]: this is the cart rejecting
    /// input, not a catalog query coming back empty.
    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    /// Quantity is zero or negative where a positive value is required
    /// (or negative where zero is allowed).
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// Current stock can't cover a cart line at checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: MANGO-ALPHONSO x3
    ///      │
    ///      ▼
    /// Checkout: current stock = 2
    ///      │
    ///      ▼
    /// OutOfStock { product_id: "MANGO-ALPHONSO", available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Only 2 left", cart unchanged
    /// ```
    #[error("Out of stock for {product_id}: available {available}, requested {requested}")]
    OutOfStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Checkout attempted with no lines in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout is already running against this cart.
    #[error("A checkout is already in progress for this cart")]
    CheckoutInProgress,

    /// Cart has exceeded maximum allowed distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A line or grand total doesn't fit in `i64` cents.
    #[error("Total exceeds the largest representable amount")]
    TotalOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while loading catalog records, before any business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., illegal characters in an id, malformed JSON).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two catalog records sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            product_id: "MANGO-ALPHONSO".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Out of stock for MANGO-ALPHONSO: available 2, requested 3"
        );
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
        assert_eq!(
            CoreError::InvalidQuantity { quantity: -1 }.to_string(),
            "Invalid quantity: -1"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "id".to_string(),
        };
        assert_eq!(err.to_string(), "id is required");

        let err = ValidationError::Duplicate {
            field: "id".to_string(),
            value: "A".to_string(),
        };
        assert_eq!(err.to_string(), "id 'A' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
