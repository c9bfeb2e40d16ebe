//! # Bundle Error Types
//!
//! Two layers of errors live here:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mango Mart                             │
//! │                                                                         │
//! │  Startup                            Runtime                             │
//! │  ───────                            ───────                             │
//! │                                                                         │
//! │  config file / catalog load         UI Command                          │
//! │         │                                │                              │
//! │         ▼                                ▼                              │
//! │    BundleError                      CoreError (mango-core)              │
//! │    (initialize() fails)                  │                              │
//! │                                          ▼                              │
//! │                                     ApiError { code, message }          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                     UI: switch (e.code) { ... }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ApiError` is what leaves the bundle. It serializes as
//! `{"code":"OUT_OF_STOCK","message":"..."}` so the UI can branch on a stable
//! code and show the message verbatim.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use ts_rs::TS;

use mango_core::{CoreError, ValidationError};

// =============================================================================
// Startup Errors
// =============================================================================

/// Failures while building the bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Reading or writing a file named by configuration failed.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file isn't valid TOML for [`BundleConfig`](crate::config::BundleConfig).
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are out of bounds.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catalog data failed to parse or validate.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] ValidationError),

    /// A receipt or reply couldn't be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading commands from stdin or writing replies to stdout failed.
    #[error("Host I/O error: {0}")]
    Host(#[from] std::io::Error),
}

/// Result type alias for bundle startup.
pub type BundleResult<T> = Result<T, BundleError>;

// =============================================================================
// API Errors
// =============================================================================

/// Error returned for a UI command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[error("{code:?}: {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Catalog lookup found nothing
    NotFound,

    /// Cart operation named a product the catalog doesn't carry
    UnknownProduct,

    /// Quantity out of the allowed range
    InvalidQuantity,

    /// Stock can't cover a cart line
    OutOfStock,

    /// Checkout on an empty cart
    EmptyCart,

    /// Another checkout holds the cart
    CheckoutInProgress,

    /// Input validation failed
    ValidationError,

    /// The inventory collaborator couldn't answer
    InventoryUnavailable,

    /// Anything the UI can't act on
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an inventory error.
    pub fn inventory(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InventoryUnavailable, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NotFound(_) => ErrorCode::NotFound,
            CoreError::UnknownProduct(_) => ErrorCode::UnknownProduct,
            CoreError::InvalidQuantity { .. } | CoreError::QuantityTooLarge { .. } => {
                ErrorCode::InvalidQuantity
            }
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::EmptyCart => ErrorCode::EmptyCart,
            CoreError::CheckoutInProgress => ErrorCode::CheckoutInProgress,
            CoreError::CartTooLarge { .. }
            | CoreError::TotalOverflow
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<BundleError> for ApiError {
    fn from(err: BundleError) -> Self {
        ApiError::internal(err.to_string())
    }
}

/// Result type alias for UI-facing operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (CoreError::NotFound("A".into()), ErrorCode::NotFound),
            (CoreError::UnknownProduct("A".into()), ErrorCode::UnknownProduct),
            (
                CoreError::InvalidQuantity { quantity: 0 },
                ErrorCode::InvalidQuantity,
            ),
            (
                CoreError::OutOfStock {
                    product_id: "A".into(),
                    available: 2,
                    requested: 3,
                },
                ErrorCode::OutOfStock,
            ),
            (CoreError::EmptyCart, ErrorCode::EmptyCart),
            (CoreError::CheckoutInProgress, ErrorCode::CheckoutInProgress),
            (CoreError::CartTooLarge { max: 100 }, ErrorCode::ValidationError),
            (CoreError::TotalOverflow, ErrorCode::ValidationError),
        ];

        for (err, code) in cases {
            assert_eq!(ApiError::from(err).code, code);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(CoreError::EmptyCart);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "EMPTY_CART");
        assert_eq!(json["message"], "Cart is empty");
    }
}
